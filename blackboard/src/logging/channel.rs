use crossbeam::channel::{Receiver, Sender, unbounded};
use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};

/// A log record as delivered by [`ChannelLogger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMessage {
    pub level: Level,
    pub target: String,
    pub message: String,
}

/// A `log::Log` implementation that forwards records over a crossbeam channel.
pub struct ChannelLogger {
    sender: Sender<LogMessage>,
    max_level: LevelFilter,
}

impl log::Log for ChannelLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            // A dropped receiver just means nobody is listening anymore.
            let _ = self.sender.try_send(LogMessage {
                level: record.level(),
                target: record.target().to_string(),
                message: format!("{}", record.args()),
            });
        }
    }

    fn flush(&self) {}
}

impl ChannelLogger {
    pub fn new(sender: Sender<LogMessage>, max_level: LevelFilter) -> Self {
        Self { sender, max_level }
    }

    /// Creates a logger and the receiving end of its unbounded channel.
    pub fn with_receiver(max_level: LevelFilter) -> (Self, Receiver<LogMessage>) {
        let (sender, receiver) = unbounded();
        (Self::new(sender, max_level), receiver)
    }

    /// The most verbose level this logger forwards.
    #[inline]
    pub fn max_level(&self) -> LevelFilter {
        self.max_level
    }

    /// Installs this logger as the process-wide `log` sink.
    ///
    /// Fails if a logger has already been installed.
    pub fn install(self) -> Result<(), SetLoggerError> {
        let max_level = self.max_level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(max_level);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use log::Log;

    use super::*;

    fn record<'a>(level: Level, args: std::fmt::Arguments<'a>) -> Record<'a> {
        Record::builder()
            .level(level)
            .target("blackboard::board")
            .args(args)
            .build()
    }

    #[test]
    fn forwards_enabled_records() {
        let (logger, receiver) = ChannelLogger::with_receiver(LevelFilter::Debug);

        logger.log(&record(Level::Debug, format_args!("created store {}", 3)));

        assert_eq!(
            receiver.try_recv().unwrap(),
            LogMessage {
                level: Level::Debug,
                target: "blackboard::board".into(),
                message: "created store 3".into(),
            }
        );
    }

    #[test]
    fn drops_records_above_max_level() {
        let (logger, receiver) = ChannelLogger::with_receiver(LevelFilter::Info);

        logger.log(&record(Level::Trace, format_args!("wrote 'a'")));

        assert!(receiver.try_recv().is_err());
        assert_eq!(logger.max_level(), LevelFilter::Info);
    }

    #[test]
    fn survives_dropped_receiver() {
        let (logger, receiver) = ChannelLogger::with_receiver(LevelFilter::Trace);
        drop(receiver);

        logger.log(&record(Level::Info, format_args!("nobody listening"))); // Should not panic
    }
}
