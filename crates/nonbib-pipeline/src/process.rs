//! Driving the pipeline over batches of bibcodes.

use nonbib_core::{Bibcode, Error, Result, session::Session};

use crate::{
  boost::{BoostScorer, LogBoost},
  convert::{NonBibRecord, convert},
  derive::derive,
  join::join,
  metrics::{MetricsEngine, MetricsRecord},
};

/// Output for one bibcode.
#[derive(Debug, Clone, PartialEq)]
pub struct Processed {
  pub record:  NonBibRecord,
  /// Present when metrics output is enabled.
  pub metrics: Option<MetricsRecord>,
}

/// A bibcode that was skipped, with the reason.
#[derive(Debug)]
pub struct Failure {
  pub bibcode: Bibcode,
  pub error:   Error,
}

#[derive(Debug, Default)]
pub struct BatchReport {
  pub processed: Vec<Processed>,
  pub failures:  Vec<Failure>,
}

/// Runs join, derive, metrics and convert against one populated session.
pub struct Processor<'s, B = LogBoost> {
  session:         &'s Session,
  engine:          MetricsEngine<B>,
  compute_metrics: bool,
}

impl<'s, B: BoostScorer> Processor<'s, B> {
  pub fn new(session: &'s Session, engine: MetricsEngine<B>) -> Self {
    Self {
      session,
      engine,
      compute_metrics: true,
    }
  }

  /// Whether metrics are computed and [`Processed::metrics`] filled in.
  /// Without them no citation years are parsed; the boost is scored either
  /// way.
  pub fn compute_metrics(mut self, enabled: bool) -> Self {
    self.compute_metrics = enabled;
    self
  }

  pub fn process(&self, bibcode: &Bibcode) -> Result<Processed> {
    let joined = join(self.session, bibcode)?;
    let metrics = if self.compute_metrics {
      Some(self.engine.compute(self.session, &joined)?)
    } else {
      None
    };
    let boost = match &metrics {
      Some(m) => m.boost,
      None => self.engine.boost(&joined),
    };
    let derived = derive(joined, self.session.registry());

    Ok(Processed {
      record: convert(&derived, boost),
      metrics,
    })
  }

  /// Process every bibcode, skipping the ones that fail on their own.
  ///
  /// Stops at the first error that invalidates the session.
  pub fn process_batch<'b>(
    &self,
    bibcodes: impl IntoIterator<Item = &'b Bibcode>,
  ) -> Result<BatchReport> {
    let mut report = BatchReport::default();

    for bibcode in bibcodes {
      match self.process(bibcode) {
        Ok(processed) => report.processed.push(processed),
        Err(error) if error.is_fatal() => return Err(error),
        Err(error) => {
          tracing::warn!(%bibcode, %error, "skipping record");
          report.failures.push(Failure {
            bibcode: bibcode.clone(),
            error,
          });
        }
      }
    }

    tracing::info!(
      processed = report.processed.len(),
      failed = report.failures.len(),
      "batch complete"
    );
    Ok(report)
  }
}
