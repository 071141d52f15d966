use crate::core::histogram::hist::Histogram;
use crate::core::io::flat_tree::FlatTreeError;
use crate::core::models::event::EventRecord;
use crate::engine::config::AnalysisPlan;
use crate::engine::context::EventContext;
use crate::engine::distribution::{self, Distribution};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{debug, info, instrument};

/// Why a selected event contributed nothing to a distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SkipCounts {
    /// Nucleon-dependent fills skipped because the event had no struck nucleon.
    pub no_nucleon: u64,
    /// Fills skipped because the quantity is undefined for the event (no leading hadron,
    /// no missing-momentum entry, zero neutrino energy).
    pub undefined: u64,
}

#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub histograms: Vec<Histogram>,
    pub events_processed: usize,
    /// Events that passed at least one selection.
    pub events_selected: usize,
    pub skipped: SkipCounts,
}

/// Fills every distribution of `plan` from an event stream and normalises the result.
///
/// Events are evaluated one at a time; each event's kinematics are computed at most once
/// and only if a selected distribution needs them.
///
/// # Errors
///
/// Reader failures, inconsistent records (ambiguous or missing particles, a recomputed Q²
/// that disagrees with the stored one) and histogram arity mismatches abort the pass.
/// Events without a struck nucleon only skip the nucleon-dependent fills.
#[instrument(skip_all, name = "analysis_workflow")]
pub fn run<I>(
    events: I,
    plan: &AnalysisPlan,
    reporter: &ProgressReporter,
) -> Result<AnalysisResult, EngineError>
where
    I: IntoIterator<Item = Result<EventRecord, FlatTreeError>>,
{
    reporter.report(Progress::PhaseStart {
        name: "Preparation",
    });
    let mut distributions = distribution::instantiate(plan)?;
    info!(
        "Filling {} distribution(s) across {} selection(s).",
        distributions.len(),
        plan.selections.len()
    );
    reporter.report(Progress::PhaseFinish);

    // === Event loop ===
    reporter.report(Progress::PhaseStart { name: "Event loop" });
    reporter.report(Progress::TaskStart { total_steps: None });

    let mut events_processed = 0;
    let mut events_selected = 0;
    let mut skipped = SkipCounts::default();

    for (index, record) in events.into_iter().enumerate() {
        let event = record?;
        let weight = if plan.use_scale_factor {
            event.weight * event.scale_factor
        } else {
            event.weight
        };
        let ctx = EventContext::new(&event, &plan.kinematics);

        let selected = fill_event(&mut distributions, &ctx, index, weight, &mut skipped)?;
        if selected {
            events_selected += 1;
        }
        events_processed += 1;
        reporter.report(Progress::TaskIncrement);
    }

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);
    info!(
        events_processed,
        events_selected,
        no_nucleon = skipped.no_nucleon,
        undefined = skipped.undefined,
        "Event loop finished."
    );

    // === Normalisation ===
    reporter.report(Progress::PhaseStart {
        name: "Normalisation",
    });
    let histograms = normalize(distributions, plan);
    reporter.report(Progress::PhaseFinish);

    Ok(AnalysisResult {
        histograms,
        events_processed,
        events_selected,
        skipped,
    })
}

fn fill_event(
    distributions: &mut [Distribution],
    ctx: &EventContext<'_>,
    index: usize,
    weight: f64,
    skipped: &mut SkipCounts,
) -> Result<bool, EngineError> {
    let mut selected = false;
    for dist in distributions.iter_mut() {
        if !dist.selection.selection.passes(ctx.event) {
            continue;
        }
        selected = true;

        match dist.quantity.evaluate(ctx) {
            Ok(Some(sample)) => {
                if let Err(source) = dist.histogram.fill(sample, weight) {
                    return Err(EngineError::Histogram {
                        name: dist.name().to_string(),
                        source,
                    });
                }
            }
            Ok(None) => skipped.undefined += 1,
            Err(e) if e.is_skippable() => skipped.no_nucleon += 1,
            Err(source) => {
                return Err(EngineError::Kinematics {
                    event: index,
                    source,
                });
            }
        }
    }
    Ok(selected)
}

fn normalize(distributions: Vec<Distribution>, plan: &AnalysisPlan) -> Vec<Histogram> {
    distributions
        .into_iter()
        .map(|dist| {
            let mut hist = dist.histogram;
            let pdg = dist.selection.selection.neutrino_pdg();
            match plan.normalization.apply(&mut hist, pdg) {
                Some(factor) => debug!(histogram = hist.name(), factor, "Scaled to event rate."),
                None => debug!(histogram = hist.name(), "Left unscaled."),
            }
            hist
        })
        .collect()
}
