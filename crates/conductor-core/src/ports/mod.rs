//! Ports - 抽象化レイヤー
//!
//! ライフサイクルのコアが外側に要求するもの（時刻、ID、ポリシー評価、
//! 監査イベントの送り先）を trait として定義します。

pub mod clock;
pub mod evaluator;
pub mod event_sink;
pub mod id_generator;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::evaluator::Evaluator;
pub use self::event_sink::{EventSink, MemoryEventSink, NoopEventSink, TracingEventSink};
pub use self::id_generator::{IdGenerator, UlidGenerator};
