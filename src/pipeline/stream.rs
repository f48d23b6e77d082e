use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crossbeam_channel::{bounded, select, tick, Receiver, Sender};
use parking_lot::Mutex;
use tracing::{debug, error, info};

use crate::capture::{EstimateSink, FrameSource};
use crate::config::PipelineConfig;
use crate::error::{PitchError, Result};
use crate::float::Float;
use crate::pipeline::FrameEstimator;
use crate::series::{PitchEstimate, PitchTimeSeries};

/// Streaming mode driven by the caller: every [tick](Self::tick) pulls the
/// latest frame from the source and appends its estimate to a bounded history.
pub struct StreamingPipeline<T, S>
where
    T: Float,
    S: FrameSource,
{
    estimator: FrameEstimator<T>,
    source: S,
    series: PitchTimeSeries<T>,
}

impl<T, S> StreamingPipeline<T, S>
where
    T: Float,
    S: FrameSource,
{
    pub fn new(config: PipelineConfig, source: S) -> Result<Self> {
        let estimator = FrameEstimator::new(config)?;
        let series = PitchTimeSeries::new(estimator.config().capacity);
        Ok(StreamingPipeline {
            estimator,
            source,
            series,
        })
    }

    /// Run one tick. Returns the appended estimate, or `None` when no frame
    /// was available. Errors come from the capture source and end the session.
    pub fn tick(&mut self) -> Result<Option<PitchEstimate<T>>> {
        Ok(self
            .estimator
            .estimate_from(&mut self.source)?
            .map(|frequency| self.series.append(frequency)))
    }

    pub fn series(&self) -> &PitchTimeSeries<T> {
        &self.series
    }

    pub fn snapshot(&self) -> Vec<PitchEstimate<T>> {
        self.series.snapshot()
    }

    pub fn latest(&self) -> Option<PitchEstimate<T>> {
        self.series.latest()
    }

    /// End the session, handing back the capture source. The history is discarded.
    pub fn into_source(self) -> S {
        self.source
    }
}

/// Streaming mode on a background thread, ticking every `tick_interval`.
///
/// Ticks run one at a time on a single worker. A tick that fires while the
/// previous one is still being analyzed is coalesced into the next one.
pub struct StreamingSession<T>
where
    T: Float,
{
    series: Arc<Mutex<PitchTimeSeries<T>>>,
    cancelled: Arc<AtomicBool>,
    stop_tx: Option<Sender<()>>,
    worker: Option<JoinHandle<Result<()>>>,
}

impl<T> StreamingSession<T>
where
    T: Float,
{
    pub fn start<S>(config: PipelineConfig, source: S) -> Result<Self>
    where
        S: FrameSource + Send + 'static,
    {
        Self::start_with_sink(config, source, None)
    }

    pub fn start_with_sink<S>(
        config: PipelineConfig,
        source: S,
        sink: Option<Box<dyn EstimateSink<T> + Send>>,
    ) -> Result<Self>
    where
        S: FrameSource + Send + 'static,
    {
        let estimator = FrameEstimator::new(config)?;
        let series = Arc::new(Mutex::new(PitchTimeSeries::new(estimator.config().capacity)));
        let cancelled = Arc::new(AtomicBool::new(false));
        let (stop_tx, stop_rx) = bounded(1);

        let worker = Worker {
            estimator,
            source,
            sink,
            series: series.clone(),
            cancelled: cancelled.clone(),
        };
        let handle = thread::Builder::new()
            .name("pitch-stream".to_string())
            .spawn(move || worker.run(stop_rx))?;

        Ok(StreamingSession {
            series,
            cancelled,
            stop_tx: Some(stop_tx),
            worker: Some(handle),
        })
    }

    pub fn snapshot(&self) -> Vec<PitchEstimate<T>> {
        self.series.lock().snapshot()
    }

    pub fn latest(&self) -> Option<PitchEstimate<T>> {
        self.series.lock().latest()
    }

    pub fn len(&self) -> usize {
        self.series.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.lock().is_empty()
    }

    /// False once the worker has exited, either after [stop](Self::stop) or
    /// because the capture source failed.
    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .map_or(false, |handle| !handle.is_finished())
    }

    /// Stop the timer, wait for any in-flight tick, and return how the worker
    /// ended. Nothing is appended once this has been called. Returns the
    /// final history.
    pub fn stop(mut self) -> Result<Vec<PitchEstimate<T>>> {
        self.shutdown()?;
        let mut series = self.series.lock();
        let snapshot = series.snapshot();
        series.clear();
        Ok(snapshot)
    }

    fn shutdown(&mut self) -> Result<()> {
        // Cancel before waking the worker, so a tick already queued in the
        // select sees the flag and never starts a capture.
        self.cancelled.store(true, Ordering::SeqCst);
        self.stop_tx.take();
        match self.worker.take() {
            Some(handle) => handle.join().map_err(|_| PitchError::WorkerPanicked)?,
            None => Ok(()),
        }
    }
}

impl<T> Drop for StreamingSession<T>
where
    T: Float,
{
    fn drop(&mut self) {
        if let Err(err) = self.shutdown() {
            debug!(%err, "streaming session ended with an error");
        }
    }
}

struct Worker<T, S>
where
    T: Float,
{
    estimator: FrameEstimator<T>,
    source: S,
    sink: Option<Box<dyn EstimateSink<T> + Send>>,
    series: Arc<Mutex<PitchTimeSeries<T>>>,
    cancelled: Arc<AtomicBool>,
}

impl<T, S> Worker<T, S>
where
    T: Float,
    S: FrameSource,
{
    fn run(mut self, stop_rx: Receiver<()>) -> Result<()> {
        let interval = self.estimator.config().tick_interval;
        let ticker = tick(interval);
        info!(?interval, "streaming session started");

        let mut last_tick: Option<Instant> = None;
        loop {
            select! {
                recv(stop_rx) -> _ => break,
                recv(ticker) -> fired => {
                    if let (Ok(fired), Some(previous)) = (fired, last_tick) {
                        let elapsed = fired.duration_since(previous).as_nanos();
                        let coalesced = (elapsed / interval.as_nanos().max(1)).saturating_sub(1) as u64;
                        if coalesced > 0 {
                            debug!(coalesced, "coalesced overlapping ticks");
                        }
                    }
                    last_tick = fired.ok();
                    if self.cancelled.load(Ordering::SeqCst) {
                        break;
                    }
                    if let Err(err) = self.process_tick() {
                        error!(%err, "capture failed, ending streaming session");
                        return Err(err);
                    }
                }
            }
        }

        info!("streaming session stopped");
        Ok(())
    }

    fn process_tick(&mut self) -> Result<()> {
        let frequency = match self.estimator.estimate_from(&mut self.source)? {
            Some(frequency) => frequency,
            None => return Ok(()),
        };

        let estimate = {
            let mut series = self.series.lock();
            // Checked under the lock so no estimate lands after `stop`.
            if self.cancelled.load(Ordering::SeqCst) {
                debug!("discarding estimate from cancelled tick");
                return Ok(());
            }
            series.append(frequency)
        };
        if let Some(sink) = self.sink.as_mut() {
            sink.on_estimate(&estimate);
        }
        Ok(())
    }
}
