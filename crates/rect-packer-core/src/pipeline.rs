use crate::bin::Bin;
use crate::config::{AutoMode, FlipTrigger, Heuristic, PackerConfig};
use crate::error::{RectPackerError, Result};
use crate::model::{PackStats, Rectangle};
use std::time::Instant;
use tracing::{debug, info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Output of a packing run: the filled bins and the settings that produced them.
#[derive(Debug, Clone)]
pub struct PackOutput {
    pub bins: Vec<Bin>,
    pub heuristic: Heuristic,
    pub flip_trigger: FlipTrigger,
}

impl PackOutput {
    pub fn stats(&self) -> PackStats {
        PackStats::from_bins(&self.bins)
    }
}

#[instrument(skip_all, fields(items = items.len()))]
/// Packs `items` into as many bins of the configured size as needed.
///
/// Each new bin receives the previous bin's `cant_pack` through `insert_many`.
/// When `auto_mode` is set, a portfolio of heuristics is tried instead (see `pack_auto`).
pub fn pack_rectangles(items: Vec<Rectangle>, cfg: &PackerConfig) -> Result<PackOutput> {
    cfg.validate()?;

    if items.is_empty() {
        return Err(RectPackerError::Empty);
    }

    if cfg.auto_mode.is_some() {
        return pack_auto(items, cfg);
    }

    pack_with(items, cfg)
}

fn pack_with(items: Vec<Rectangle>, cfg: &PackerConfig) -> Result<PackOutput> {
    let total = items.len();
    let mut bins: Vec<Bin> = Vec::new();
    let mut to_pack = items;

    while !to_pack.is_empty() {
        // Earlier bins already rejected every pending item, so only a fresh bin can make progress.
        let mut bin = Bin::from_config(cfg)?;
        let packed = bin.insert_many(to_pack, cfg.heuristic);
        if packed.is_empty() {
            let placed = total - bin.cant_pack().len();
            return Err(RectPackerError::OutOfSpace { placed, total });
        }
        debug!(
            bin = bins.len(),
            packed = packed.len(),
            usage = bin.usage(),
            "bin filled"
        );
        to_pack = bin.cant_pack().to_vec();
        bins.push(bin);
    }

    Ok(PackOutput {
        bins,
        heuristic: cfg.heuristic,
        flip_trigger: cfg.flip_trigger,
    })
}

fn candidates(base: &PackerConfig, mode: AutoMode) -> Vec<PackerConfig> {
    let with = |heuristic: Heuristic, flip_trigger: FlipTrigger| PackerConfig {
        heuristic,
        flip_trigger,
        auto_mode: None,
        ..base.clone()
    };
    match mode {
        AutoMode::Fast => vec![
            with(Heuristic::BottomLeft, FlipTrigger::WiderThanTall),
            with(Heuristic::BestAreaFit, FlipTrigger::WiderThanTall),
        ],
        AutoMode::Quality => {
            let mut out = Vec::new();
            for trigger in [FlipTrigger::WiderThanTall, FlipTrigger::Always] {
                for h in Heuristic::MAXRECTS {
                    out.push(with(h, trigger));
                }
            }
            out
        }
    }
}

/// Fewest bins first; on a tie the emptier last bin wins (earlier bins are fuller).
fn is_better(a: &PackOutput, b: &PackOutput) -> bool {
    let last_usage = |o: &PackOutput| o.bins.last().map_or(0.0, Bin::usage);
    a.bins.len() < b.bins.len()
        || (a.bins.len() == b.bins.len() && last_usage(a) < last_usage(b))
}

fn over_budget(budget_ms: u64, start: Instant) -> bool {
    budget_ms > 0 && start.elapsed().as_millis() as u64 > budget_ms
}

/// Packs `items` with each candidate and keeps the best output.
/// Returns the best output and how many candidates were actually run.
fn run_portfolio(
    items: &[Rectangle],
    candidates: &[PackerConfig],
    cfg: &PackerConfig,
    start: Instant,
) -> (Option<PackOutput>, usize) {
    let budget_ms = cfg.time_budget_ms.unwrap_or(0);

    #[cfg(feature = "parallel")]
    if cfg.parallel {
        use std::sync::atomic::{AtomicUsize, Ordering};
        let evaluated = AtomicUsize::new(0);
        let best = candidates
            .par_iter()
            .filter_map(|cand| {
                if over_budget(budget_ms, start) {
                    return None;
                }
                evaluated.fetch_add(1, Ordering::Relaxed);
                pack_with(items.to_vec(), cand).ok()
            })
            .reduce_with(|best, out| if is_better(&out, &best) { out } else { best });
        return (best, evaluated.into_inner());
    }

    let mut best: Option<PackOutput> = None;
    let mut evaluated = 0;
    for cand in candidates {
        if over_budget(budget_ms, start) {
            debug!("auto time budget exhausted");
            break;
        }
        evaluated += 1;
        if let Ok(out) = pack_with(items.to_vec(), cand) {
            debug!(
                heuristic = %cand.heuristic,
                trigger = ?cand.flip_trigger,
                bins = out.bins.len(),
                "auto candidate"
            );
            if best.as_ref().is_none_or(|b| is_better(&out, b)) {
                best = Some(out);
            }
        }
    }
    (best, evaluated)
}

#[instrument(skip_all, fields(items = items.len()))]
/// Tries a small portfolio of heuristic/flip-trigger combinations and returns the best result.
///
/// - `Fast`: BottomLeft and BestAreaFit.
/// - `Quality`: the four MaxRects heuristics under both flip triggers.
/// - `time_budget_ms` stops starting new candidates once exceeded; `parallel` evaluates
///   with rayon when the `parallel` feature is enabled.
pub fn pack_auto(items: Vec<Rectangle>, cfg: &PackerConfig) -> Result<PackOutput> {
    cfg.validate()?;
    if items.is_empty() {
        return Err(RectPackerError::Empty);
    }
    let mode = cfg.auto_mode.unwrap_or(AutoMode::Quality);
    let candidates = candidates(cfg, mode);
    let total = items.len();
    let start = Instant::now();

    let (best, evaluated) = run_portfolio(&items, &candidates, cfg, start);
    debug!(evaluated, candidates = candidates.len(), "auto portfolio done");

    let best = best.ok_or(RectPackerError::OutOfSpace { placed: 0, total })?;
    info!(
        heuristic = %best.heuristic,
        trigger = ?best.flip_trigger,
        bins = best.bins.len(),
        "auto selected"
    );
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unpackable() -> Vec<Rectangle> {
        vec![Rectangle::new(500, 500).unwrap()]
    }

    fn quality(parallel: bool) -> PackerConfig {
        PackerConfig::builder()
            .with_bin_dimensions(100, 100)
            .auto_mode(Some(AutoMode::Quality))
            .parallel(parallel)
            .build()
    }

    #[test]
    fn failing_portfolio_runs_each_candidate_once() {
        for parallel in [false, true] {
            let cfg = quality(parallel);
            let cands = candidates(&cfg, AutoMode::Quality);
            let (best, evaluated) = run_portfolio(&unpackable(), &cands, &cfg, Instant::now());
            assert!(best.is_none());
            assert_eq!(evaluated, cands.len(), "parallel={parallel}");
        }
        assert!(matches!(
            pack_auto(unpackable(), &quality(true)),
            Err(RectPackerError::OutOfSpace { placed: 0, total: 1 })
        ));
    }

    #[test]
    fn exhausted_budget_starts_no_candidate() {
        for parallel in [false, true] {
            let mut cfg = quality(parallel);
            cfg.time_budget_ms = Some(1);
            let cands = candidates(&cfg, AutoMode::Quality);
            let long_ago = Instant::now() - std::time::Duration::from_millis(50);
            let items = [Rectangle::new(10, 10).unwrap()];
            let (best, evaluated) = run_portfolio(&items, &cands, &cfg, long_ago);
            assert!(best.is_none());
            assert_eq!(evaluated, 0, "parallel={parallel}");
        }
    }
}
