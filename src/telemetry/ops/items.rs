use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Items;

#[derive(Copy, Clone, Debug)]
pub enum Phase { List, Update }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self { Phase::List => "list", Phase::Update => "update" } }
    fn span(&self) -> Span { match self { Phase::List => info_span!("list"), Phase::Update => info_span!("update") } }
}

impl OpMarker for Items {
    const NAME: &'static str = "items";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("items") }
}
