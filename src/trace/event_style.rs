//! Default event classifier: trace event name → timeline display title
//!
//! Names without an entry are titled "Other", so the classifier's output
//! space stays inside the default taxonomy.

use crate::trace::event::TraceEvent;
use crate::trace::tree::{EventClassifier, EventStyle};
use std::collections::HashMap;

/// Title for event names the table does not list
pub const FALLBACK_TITLE: &str = "Other";

const EVENT_STYLES: &[(&str, &str)] = &[
    // Loading
    ("ResourceSendRequest", "Send Request"),
    ("ResourceReceiveResponse", "Receive Response"),
    ("ResourceReceivedData", "Receive Data"),
    ("ResourceFinish", "Finish Loading"),
    // Parsing
    ("ParseHTML", "Parse HTML"),
    ("ParseAuthorStyleSheet", "Parse Stylesheet"),
    // Scripting
    ("EvaluateScript", "Evaluate Script"),
    ("v8.evaluateModule", "Evaluate Script"),
    ("FunctionCall", "Function Call"),
    ("EventDispatch", "Event"),
    ("TimerFire", "Timer Fired"),
    ("TimerInstall", "Install Timer"),
    ("TimerRemove", "Remove Timer"),
    ("FireAnimationFrame", "Animation Frame Fired"),
    ("RequestAnimationFrame", "Request Animation Frame"),
    ("CancelAnimationFrame", "Cancel Animation Frame"),
    ("RequestIdleCallback", "Request Idle Callback"),
    ("CancelIdleCallback", "Cancel Idle Callback"),
    ("FireIdleCallback", "Fire Idle Callback"),
    ("RunMicrotasks", "Run Microtasks"),
    ("XHRReadyStateChange", "XHR Ready State Change"),
    ("XHRLoad", "XHR Load"),
    ("TimeStamp", "Timestamp"),
    ("ConsoleTime", "Console Time"),
    ("UserTiming", "User Timing"),
    ("EmbedderCallback", "Embedder Callback"),
    ("JSFrame", "JS Frame"),
    ("ProfileCall", "JS Frame"),
    ("InputLatency", "Input Latency"),
    ("WebSocketCreate", "Create WebSocket"),
    ("WebSocketDestroy", "Destroy WebSocket"),
    ("WebSocketSendHandshakeRequest", "Send WebSocket Handshake"),
    ("WebSocketReceiveHandshakeResponse", "Receive WebSocket Handshake"),
    ("MarkDOMContent", "DOMContentLoaded event"),
    ("MarkLoad", "Load event"),
    // Script parse/compile
    ("v8.compile", "Compile Script"),
    ("v8.compileModule", "Compile Script"),
    ("v8.parseOnBackground", "Parse Script"),
    ("V8.ScriptCompiler", "Compile Script"),
    // Garbage collection
    ("MinorGC", "Minor GC"),
    ("MajorGC", "Major GC"),
    ("V8.GCScavenger", "Minor GC"),
    ("V8.GCFinalizeMC", "Major GC"),
    ("GCEvent", "GC Event"),
    ("BlinkGC.AtomicPhase", "DOM GC"),
    ("BlinkGCMarking", "DOM GC"),
    // Style & layout
    ("Layout", "Layout"),
    ("UpdateLayoutTree", "Recalculate Style"),
    ("RecalculateStyles", "Recalculate Style"),
    ("ScheduleStyleRecalculation", "Schedule Style Recalculation"),
    ("InvalidateLayout", "Invalidate Layout"),
    // Compositing
    ("CompositeLayers", "Composite Layers"),
    ("UpdateLayer", "Update Layer"),
    ("UpdateLayerTree", "Update Layer Tree"),
    ("HitTest", "Hit Test"),
    ("ScrollLayer", "Scroll"),
    // Painting
    ("Paint", "Paint"),
    ("PaintSetup", "Paint Setup"),
    ("RasterTask", "Rasterize Paint"),
    ("Animation", "Animation"),
    ("BeginFrame", "Frame Start"),
    ("BeginMainThreadFrame", "Frame Start (main thread)"),
    ("DrawFrame", "Draw Frame"),
    ("RequestMainThreadFrame", "Request Main Thread Frame"),
    ("MarkFirstPaint", "First paint"),
    ("firstMeaningfulPaint", "FMP"),
    ("firstMeaningfulPaintCandidate", "FMP candidate"),
    // Images
    ("PaintImage", "Paint Image"),
    ("Decode Image", "Image Decode"),
    ("ImageDecodeTask", "Image Decode"),
    ("Resize Image", "Image Resize"),
    // GPU
    ("GPUTask", "GPU"),
    // Other
    ("Task", "Task"),
    ("RunTask", "Task"),
    ("ThreadControllerImpl::RunTask", "Task"),
    ("ThreadControllerImpl::DoWork", "Task"),
    ("AsyncTask", "Async Task"),
];

/// Event-name lookup table producing display titles
#[derive(Debug, Clone)]
pub struct EventStyleClassifier {
    titles: HashMap<&'static str, &'static str>,
}

impl Default for EventStyleClassifier {
    fn default() -> Self {
        Self {
            titles: EVENT_STYLES.iter().copied().collect(),
        }
    }
}

impl EventStyleClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every title this classifier can produce, fallback included
    pub fn titles(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.titles
            .values()
            .copied()
            .chain(std::iter::once(FALLBACK_TITLE))
    }

    pub fn title_for(&self, event_name: &str) -> &'static str {
        self.titles
            .get(event_name)
            .copied()
            .unwrap_or(FALLBACK_TITLE)
    }
}

impl EventClassifier for EventStyleClassifier {
    fn classify(&self, event: &TraceEvent) -> EventStyle {
        EventStyle::new(self.title_for(&event.name))
    }
}
