//! Diagnostic log. The terminal belongs to the UI, so output goes to a file.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::FetchError;

/// Install the global subscriber, appending to `path`. `RUST_LOG` overrides the `info` default.
pub fn init(path: &Path) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(io::Error::other)
}

/// Sink for failed fetches; the panel itself keeps showing the previous reading.
pub fn report_fetch_error(location: &str, error: &FetchError) {
    tracing::error!(location, %error, "weather fetch failed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Arc;

    use crate::action::Action;
    use crate::effect::Effect;
    use crate::reducer::reducer;
    use crate::state::AppState;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn lines(&self) -> Vec<String> {
            let bytes = self.0.lock().unwrap();
            String::from_utf8_lossy(&bytes)
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    #[test]
    fn test_failed_fetch_logged_once() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let mut state = AppState::default().with_location("Paris, France");
            reducer(&mut state, Action::WeatherFetch);
            let result = reducer(
                &mut state,
                Action::WeatherDidError {
                    request: 0,
                    location: "Paris, France".into(),
                    error: FetchError::Status(503),
                },
            );
            for effect in result.effects {
                if let Effect::ReportFetchError { location, error } = effect {
                    report_fetch_error(&location, &error);
                }
            }
        });

        let lines: Vec<_> = captured
            .lines()
            .into_iter()
            .filter(|line| line.contains("weather fetch failed"))
            .collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("ERROR"));
        assert!(lines[0].contains("Paris, France"));
        assert!(lines[0].contains("unexpected HTTP status 503"));
    }
}
