use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Refresh;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Plan, Feed, Fetch, WriteItem }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::Plan => "plan",
        Phase::Feed => "feed",
        Phase::Fetch => "fetch",
        Phase::WriteItem => "write_item",
    }}
    fn span(&self) -> Span { match self {
        Phase::Plan => info_span!("plan"),
        Phase::Feed => info_span!("feed"),
        Phase::Fetch => info_span!("fetch"),
        Phase::WriteItem => info_span!("write_item"),
    }}
}

impl OpMarker for Refresh {
    const NAME: &'static str = "refresh";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("refresh") }
}
