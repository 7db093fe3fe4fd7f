use crate::context::UnitOfWork;
use crate::error::HandlerError;
use crate::events::{Event, Payload};
use crate::handlers::handler::Receive;

/// Base handler that logs events to stdout.
///
/// Enabled via the `logging` feature. Useful for demos and debugging.
#[derive(Debug, Default)]
pub struct LogWriter;

impl Receive for LogWriter {
    fn on_event(&self, _uow: &mut UnitOfWork, e: &Event) -> Result<(), HandlerError> {
        match &e.payload {
            Payload::Created { key, record } => {
                println!(
                    "[created] seq={} sender={} key={} fields={}",
                    e.seq,
                    e.sender,
                    key,
                    record.len()
                );
            }
            Payload::Updated { key, record } => {
                println!(
                    "[updated] seq={} sender={} key={} fields={}",
                    e.seq,
                    e.sender,
                    key,
                    record.len()
                );
            }
            Payload::Deleted { key } => {
                println!("[deleted] seq={} sender={} key={}", e.seq, e.sender, key);
            }
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
