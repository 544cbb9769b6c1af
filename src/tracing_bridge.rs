//! Bridge from `tracing` spans to Micromegas thread-local named scopes.
//!
//! Two families of spans are forwarded: the spans this crate opens around
//! each session tick and path search, and the "schedule" spans Bevy emits
//! with its `trace` feature. Every other span is ignored by this layer.

use micromegas_tracing::dispatch::{on_begin_named_scope, on_end_named_scope};
use micromegas_tracing::intern_string::intern_string;
use tracing::Subscriber;
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

// All bridged spans share a single static source location.
micromegas_tracing::static_span_location!(BRIDGE_LOCATION);

const CRATE_TARGET: &str = env!("CARGO_CRATE_NAME");

/// Scope name stored in a bridged span's extensions.
struct BridgedSpan {
    name: &'static str,
}

/// Extracts the `name` field Bevy attaches to schedule spans.
#[derive(Default)]
struct NameVisitor {
    name: Option<String>,
}

impl Visit for NameVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "name" {
            self.name = Some(format!("{:?}", value));
        }
    }
}

/// True for targets of spans opened inside this crate.
pub fn is_crate_target(target: &str) -> bool {
    target == CRATE_TARGET
        || target
            .strip_prefix(CRATE_TARGET)
            .is_some_and(|rest| rest.starts_with("::"))
}

fn scope_name(attrs: &Attributes<'_>) -> Option<&'static str> {
    let metadata = attrs.metadata();
    if is_crate_target(metadata.target()) {
        return Some(metadata.name());
    }
    if metadata.name() == "schedule" {
        let mut visitor = NameVisitor::default();
        attrs.record(&mut visitor);
        let label = visitor.name.unwrap_or_default();
        return Some(intern_string(&label));
    }
    None
}

/// A `tracing_subscriber::Layer` that turns selected spans into Micromegas
/// named-scope begin/end events.
pub struct MicromegasBridgeLayer;

impl<S> Layer<S> for MicromegasBridgeLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let Some(name) = scope_name(attrs) else {
            return;
        };
        if let Some(span) = ctx.span(id) {
            span.extensions_mut().insert(BridgedSpan { name });
        }
    }

    fn on_enter(&self, id: &Id, ctx: Context<'_, S>) {
        if let Some(span) = ctx.span(id) {
            if let Some(data) = span.extensions().get::<BridgedSpan>() {
                on_begin_named_scope(&BRIDGE_LOCATION, data.name);
            }
        }
    }

    fn on_exit(&self, id: &Id, ctx: Context<'_, S>) {
        if let Some(span) = ctx.span(id) {
            if let Some(data) = span.extensions().get::<BridgedSpan>() {
                on_end_named_scope(&BRIDGE_LOCATION, data.name);
            }
        }
    }
}
