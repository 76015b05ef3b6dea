//! Alert message formatting.

use crate::symbols::display_symbol;
use bandwatch_core::types::{CrossingEvent, SignalKind, Timeframe};

fn marker(kind: SignalKind) -> &'static str {
    match kind {
        SignalKind::CrossAbove => "✅↑",
        SignalKind::CrossBelow => "❌↓",
        SignalKind::OutsideAbove => "ℹ️↑",
        SignalKind::OutsideBelow => "ℹ️↓",
    }
}

/// Render a crossing event into the outbound message body.
///
/// Prices are fixed to six decimal places here and nowhere earlier; all
/// upstream math stays in full double precision.
pub fn format_alert(event: &CrossingEvent, timeframe: Timeframe) -> String {
    format!(
        "{} **{}** {} **{}**\nClose: {:.6}\nUpper: {:.6} | Lower: {:.6}\nBar: {}",
        marker(event.kind),
        display_symbol(&event.symbol),
        timeframe,
        event.kind.label(),
        event.close,
        event.upper,
        event.lower,
        event.datetime().format("%Y-%m-%d %H:%M:%S UTC"),
    )
}
