//! # Detection Session
//!
//! The capture → detect → match loop. One frame is captured, analysed and
//! reported before the next one is requested, so readings come out in
//! capture order and no state crosses a cycle boundary. The stop condition is
//! consulted only between cycles.

use std::time::Duration;

use anyhow::Result;

use crate::AnalysisResult;
use crate::config::DetectorConfig;
use crate::table::FrequencyTable;

/// Anything that can hand out fixed-length mono frames, blocking until one
/// is ready.
pub trait FrameSource {
    fn sample_rate(&self) -> u32;
    fn next_frame(&mut self) -> Result<Vec<f64>>;
}

/// Runs detection cycles until `keep_running` returns `false` or the source
/// fails.
///
/// # Arguments
/// * `source` - Frame supplier (live capture or synthetic)
/// * `table` - Frequency table to match against
/// * `config` - Estimator settings and pause between cycles
/// * `on_result` - Called once per cycle, in capture order
/// * `keep_running` - Checked before every cycle
///
/// # Returns
/// * `Ok(cycles)` - Number of completed cycles
/// * `Err(e)` - The frame source failed
pub fn run_session<S, R, K>(
    source: &mut S,
    table: &FrequencyTable,
    config: &DetectorConfig,
    mut on_result: R,
    mut keep_running: K,
) -> Result<usize>
where
    S: FrameSource + ?Sized,
    R: FnMut(&AnalysisResult),
    K: FnMut() -> bool,
{
    let pause = Duration::from_millis(config.cycle_pause_ms);
    let mut cycles = 0;

    log::info!(
        "[SESSION] Starting detection at {} Hz against {} notes",
        source.sample_rate(),
        table.len()
    );

    while keep_running() {
        let frame = source.next_frame()?;
        let result = crate::analyze_frame(&frame, source.sample_rate(), &config.pitch, table);
        on_result(&result);
        cycles += 1;

        if !pause.is_zero() {
            std::thread::sleep(pause);
        }
    }

    log::info!("[SESSION] Stopped after {} cycles", cycles);
    Ok(cycles)
}
