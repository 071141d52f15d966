use crate::core::io::flat_tree::FlatTreeError;
use crate::core::io::kinematics_table::{KinematicsRow, KinematicsTableWriter};
use crate::core::models::event::EventRecord;
use crate::core::physics::kinematics::{self, KinematicsError, KinematicsSettings};
use crate::core::physics::locator;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use std::io::Write;
use tracing::{info, instrument, warn};

/// Status written for rows whose bundle was computed.
pub const STATUS_OK: &str = "ok";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TabulationSummary {
    pub rows: usize,
    pub complete: usize,
    pub no_nucleon: usize,
    /// Rows for inconsistent records (ambiguous or missing particles, Q² mismatch).
    pub inconsistent: usize,
}

fn status(err: &KinematicsError) -> String {
    match err {
        KinematicsError::NoNucleonFound => "no-nucleon".to_string(),
        KinematicsError::AmbiguousParticle { role, .. } => format!("ambiguous-{}", role.slug()),
        KinematicsError::MissingParticle { role } => format!("missing-{}", role.slug()),
        KinematicsError::ReferenceMismatch { .. } => "q2-mismatch".to_string(),
    }
}

/// Computes the table row of a single event.
///
/// Failures are recorded in the row's `status` rather than returned. The momentum-transfer
/// columns are filled whenever the neutrino and lepton could be located, even without a
/// struck nucleon.
pub fn tabulate_event(
    index: usize,
    event: &EventRecord,
    settings: &KinematicsSettings,
) -> (KinematicsRow, Option<KinematicsError>) {
    let interaction = event.interaction();
    let mut row = KinematicsRow {
        event: index,
        mode: event.mode,
        class: interaction.class.to_string(),
        current: interaction.current.to_string(),
        status: STATUS_OK.to_string(),
        q2_reference: event.reference.q2,
        ..Default::default()
    };

    let located = match locator::locate(event, interaction) {
        Ok(located) => located,
        Err(err) => {
            row.status = status(&err);
            return (row, Some(err));
        }
    };

    let (q, q2) = kinematics::momentum_transfer(&located.neutrino.p4, &located.lepton.p4);
    row.q2 = Some(q2);
    row.q0 = Some(q.energy);
    row.q3 = Some(q.p());
    row.nucleon_source = located.nucleon.map(|n| n.source.label().to_string());

    match kinematics::from_located(&located, event.reference.q2, settings) {
        Ok(b) => {
            row.w_theorist = Some(b.w_theorist);
            row.w_experimentalist = Some(b.w_experimentalist);
            row.x_theorist = Some(b.x_theorist);
            row.x_experimentalist = Some(b.x_experimentalist);
            row.y_theorist = Some(b.y_theorist);
            row.y_experimentalist = Some(b.y_experimentalist);
            row.nu_theorist = Some(b.nu_theorist);
            row.nu_experimentalist = Some(b.nu_experimentalist);
            row.binding_energy = b.binding_energy;
            (row, None)
        }
        Err(err) => {
            row.status = status(&err);
            (row, Some(err))
        }
    }
}

/// Writes one kinematics row per event to `sink`, stopping after `limit` events if given.
///
/// # Errors
///
/// Only reader and writer failures are returned; per-event kinematics failures end up in
/// the `status` column.
#[instrument(skip_all, name = "tabulation_workflow")]
pub fn run<I, W>(
    events: I,
    settings: &KinematicsSettings,
    limit: Option<usize>,
    reporter: &ProgressReporter,
    sink: &mut KinematicsTableWriter<W>,
) -> Result<TabulationSummary, EngineError>
where
    I: IntoIterator<Item = Result<EventRecord, FlatTreeError>>,
    W: Write,
{
    reporter.report(Progress::PhaseStart {
        name: "Tabulating kinematics",
    });
    reporter.report(Progress::TaskStart {
        total_steps: limit.map(|n| n as u64),
    });

    let mut summary = TabulationSummary::default();
    let events = events.into_iter().take(limit.unwrap_or(usize::MAX));

    for (index, record) in events.enumerate() {
        let event = record?;
        let (row, err) = tabulate_event(index, &event, settings);
        match err {
            None => summary.complete += 1,
            Some(KinematicsError::NoNucleonFound) => summary.no_nucleon += 1,
            Some(err) => {
                warn!(event = index, "{err}");
                summary.inconsistent += 1;
            }
        }
        sink.write_row(&row)?;
        summary.rows += 1;
        reporter.report(Progress::TaskIncrement);
    }

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);
    info!(
        rows = summary.rows,
        complete = summary.complete,
        no_nucleon = summary.no_nucleon,
        inconsistent = summary.inconsistent,
        "Kinematics table written."
    );
    Ok(summary)
}
