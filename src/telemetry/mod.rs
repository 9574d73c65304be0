pub mod config;
pub mod ctx;
pub mod ops;

use std::marker::PhantomData;

use ctx::LogCtx;

pub fn init() -> LogCtx<ops::init::Init> { LogCtx { json: config::logs_are_json(), _marker: PhantomData } }
pub fn feed() -> LogCtx<ops::feed::Feed> { LogCtx { json: config::logs_are_json(), _marker: PhantomData } }
pub fn refresh() -> LogCtx<ops::refresh::Refresh> { LogCtx { json: config::logs_are_json(), _marker: PhantomData } }
pub fn items() -> LogCtx<ops::items::Items> { LogCtx { json: config::logs_are_json(), _marker: PhantomData } }
pub fn serve() -> LogCtx<ops::serve::Serve> { LogCtx { json: config::logs_are_json(), _marker: PhantomData } }
