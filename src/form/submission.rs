use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::time::Duration;

use futures_timer::Delay;
use gpui::SharedString;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::controller::FieldKey;

pub const SIMULATED_FAILURE_MESSAGE: &str = "Network error occurred";
pub const SIMULATED_DELAY: Duration = Duration::from_millis(2000);
pub const SIMULATED_SUCCESS_RATE: f64 = 0.9;

/// Field name to raw field value, as read from the form at submit time.
pub type FormValues = BTreeMap<FieldKey, SharedString>;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SubmissionResult {
    Success,
    /// Delivery failed. A missing message is shown with the controller's fallback text.
    Failure(Option<SharedString>),
}

impl SubmissionResult {
    pub fn failure(message: impl Into<SharedString>) -> Self {
        Self::Failure(Some(message.into()))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

pub type BoxedSubmitFuture<'a> = Pin<Box<dyn Future<Output = SubmissionResult> + Send + 'a>>;

/// Delivers the collected form values to a backend.
///
/// The controller calls `submit` once per accepted submission and awaits the
/// single result it settles with.
pub trait Submitter: Send + Sync + 'static {
    fn submit(&self, values: FormValues) -> BoxedSubmitFuture<'_>;
}

impl<F> Submitter for F
where
    F: Fn(FormValues) -> BoxedSubmitFuture<'static> + Send + Sync + 'static,
{
    fn submit(&self, values: FormValues) -> BoxedSubmitFuture<'_> {
        (self)(values)
    }
}

/// Stand-in backend: waits a fixed delay, then succeeds at random.
pub struct SimulatedSubmitter {
    delay: Duration,
    success_rate: f64,
    rng: Mutex<StdRng>,
}

impl SimulatedSubmitter {
    /// A NaN `success_rate` falls back to [`SIMULATED_SUCCESS_RATE`]; other
    /// values are clamped into `0.0..=1.0`.
    pub fn new(delay: Duration, success_rate: f64) -> Self {
        let success_rate = if success_rate.is_nan() {
            SIMULATED_SUCCESS_RATE
        } else {
            success_rate.clamp(0.0, 1.0)
        };
        Self {
            delay,
            success_rate,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn success_rate(&self) -> f64 {
        self.success_rate
    }

    fn roll(&self) -> bool {
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        rng.gen_bool(self.success_rate)
    }
}

impl Default for SimulatedSubmitter {
    fn default() -> Self {
        Self::new(SIMULATED_DELAY, SIMULATED_SUCCESS_RATE)
    }
}

impl Submitter for SimulatedSubmitter {
    fn submit(&self, values: FormValues) -> BoxedSubmitFuture<'_> {
        Box::pin(async move {
            tracing::debug!(fields = values.len(), delay = ?self.delay, "simulating submission");
            if !self.delay.is_zero() {
                Delay::new(self.delay).await;
            }
            if self.roll() {
                SubmissionResult::Success
            } else {
                SubmissionResult::failure(SIMULATED_FAILURE_MESSAGE)
            }
        })
    }
}
