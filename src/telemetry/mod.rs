pub mod frame;
pub mod sink;

pub use frame::{magnitude, FrameScanner, Sample, WireFrame, FRAME_FOOTER, FRAME_HEADER, FRAME_LEN};
pub use sink::{Diagnostic, DiagnosticSink, FrameSink, SerialLink};
