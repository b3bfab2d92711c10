use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use rect_packer_core::config::{AutoMode, FlipTrigger, Heuristic};
use rect_packer_core::{
    Borders, FlipPolicy, PackOutput, PackerConfig, Rectangle, VisualisationOptions,
    pack_rectangles, render_bin, to_json,
};
use serde::Deserialize;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "rect-packer",
    about = "Pack rectangles (plain or windowed frames) into fixed-size bins",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack an item list into bins, render each bin and export the layout
    Pack(PackArgs),
    /// Simple timing bench (packs once per heuristic, prints time + bins + occupancy)
    Bench(BenchArgs),
}

#[derive(Parser, Debug, Clone)]
struct PackArgs {
    // Input/Output
    /// Item list (.json, .yaml or .yml)
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Output directory
    #[arg(short, long, default_value = "out", help_heading = "Input/Output")]
    out_dir: PathBuf,
    /// Base name (files will be name-<i>.png and name.json)
    #[arg(short, long, default_value = "bins", help_heading = "Input/Output")]
    name: String,
    /// YAML config file path (overrides bin/heuristic options)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,

    // Bin
    /// Bin width
    #[arg(long, default_value_t = 1024, help_heading = "Bin")]
    bin_width: u32,
    /// Bin height
    #[arg(long, default_value_t = 1024, help_heading = "Bin")]
    bin_height: u32,
    /// Allow rotating AllowFlip items (90deg)
    #[arg(long, default_value_t = true, action = ArgAction::Set, help_heading = "Bin")]
    allow_flip: bool,
    /// Unusable margin along the left edge
    #[arg(long, default_value_t = 0, help_heading = "Bin")]
    left_border: u32,
    /// Unusable margin along the bottom edge
    #[arg(long, default_value_t = 0, help_heading = "Bin")]
    bottom_border: u32,

    // Heuristics/Auto
    /// Heuristic: bl|baf|blsf|bssf|linear (or long names such as RectBestAreaFit) | auto
    #[arg(long, default_value = "baf", help_heading = "Heuristics")]
    heuristic: String,
    /// When AllowFlip items try the rotated orientation: wider_than_tall | always
    #[arg(long, default_value = "wider_than_tall", help_heading = "Heuristics")]
    flip_trigger: String,
    /// Auto mode: fast | quality
    #[arg(long, default_value = "quality", help_heading = "Auto/Portfolio")]
    auto_mode: String,
    /// Time budget for auto mode (ms)
    #[arg(long, help_heading = "Auto/Portfolio")]
    time_budget: Option<u64>,
    /// Evaluate auto candidates in parallel (requires core feature `parallel`)
    #[arg(long, default_value_t = false, help_heading = "Auto/Portfolio")]
    parallel: bool,

    // Visualisation
    /// Visualisation options file (JSON or YAML: font, fontSize, fontColour, labelMargin, margin)
    #[arg(long, help_heading = "Visualisation")]
    vis_config: Option<PathBuf>,
    /// Font file for labels (overrides the visualisation file)
    #[arg(long, help_heading = "Visualisation")]
    font: Option<PathBuf>,
    /// Label font size (overrides the visualisation file)
    #[arg(long, help_heading = "Visualisation")]
    font_size: Option<u32>,

    // Export
    /// Layout-only: compute placements and export JSON (no PNGs)
    #[arg(long, default_value_t = false, help_heading = "Export")]
    layout_only: bool,
    /// Export packing stats (JSON) to this file
    #[arg(long, help_heading = "Export")]
    export_stats: Option<PathBuf>,
    /// Print the merged configuration (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
    /// Dry run: compute layout and stats but do not write files
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
struct BenchArgs {
    /// Item list (.json, .yaml or .yml)
    input: PathBuf,
    /// Bin width
    #[arg(long, default_value_t = 1024)]
    bin_width: u32,
    /// Bin height
    #[arg(long, default_value_t = 1024)]
    bin_height: u32,
    /// Auto mode used for the final portfolio run: fast | quality
    #[arg(long, default_value = "quality")]
    auto_mode: String,
    /// Time budget for auto mode (ms)
    #[arg(long)]
    time_budget: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Pack(args) => run_pack(args),
        Commands::Bench(b) => run_bench(b),
    }
}

fn run_pack(cli: &PackArgs) -> anyhow::Result<()> {
    let base = base_config(cli)?;

    // Config file sets bin/heuristic options en bloc
    let cfg = if let Some(path) = &cli.config {
        let file =
            fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
        let y: YamlConfig = serde_yaml::from_str(&file)
            .with_context(|| format!("parse config {}", path.display()))?;
        y.into_packer_config(base)
            .with_context(|| format!("config {}", path.display()))?
    } else {
        base
    };

    if cli.print_config {
        match cli.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&cfg)?),
            _ => println!("{}", serde_json::to_string_pretty(&cfg)?),
        }
        return Ok(());
    }

    let items = load_items(&cli.input)?;
    info!(count = items.len(), "loaded items");

    let out = pack_rectangles(items, &cfg)?;
    report_bins(&out);

    let stats = out.stats();
    info!(
        bins = stats.num_bins,
        placed = stats.num_placed,
        rotated = stats.num_rotated,
        used_area = stats.used_area,
        total_area = stats.total_bin_area,
        occupancy = format!("{:.2}%", stats.occupancy * 100.0),
        "stats"
    );

    if cli.dry_run {
        return Ok(());
    }

    fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("create out_dir {}", cli.out_dir.display()))?;

    if !cli.layout_only {
        let vis = load_vis_options(cli)?;
        for (i, bin) in out.bins.iter().enumerate() {
            let png_path = cli.out_dir.join(format!("{}-{}.png", cli.name, i));
            let img = render_bin(bin, &vis).with_context(|| format!("render bin {i}"))?;
            img.save(&png_path)
                .with_context(|| format!("write {}", png_path.display()))?;
            info!(?png_path, id = i, "wrote bin");
        }
    }

    let json_path = cli.out_dir.join(format!("{}.json", cli.name));
    let json = serde_json::to_string_pretty(&to_json(&out))?;
    fs::write(&json_path, json).with_context(|| format!("write {}", json_path.display()))?;
    info!(?json_path, bins = out.bins.len(), "layout written");

    if let Some(stats_path) = &cli.export_stats {
        fs::write(stats_path, serde_json::to_string_pretty(&stats)?)
            .with_context(|| format!("write {}", stats_path.display()))?;
    }
    Ok(())
}

fn report_bins(out: &PackOutput) {
    for (i, bin) in out.bins.iter().enumerate() {
        info!(
            bin = i,
            placed = bin.used().len(),
            utilization = format!("{:.2}%", bin.usage() * 100.0),
            "bin"
        );
    }
}

fn run_bench(b: &BenchArgs) -> anyhow::Result<()> {
    let items = load_items(&b.input)?;
    let base = PackerConfig::builder()
        .with_bin_dimensions(b.bin_width, b.bin_height)
        .time_budget_ms(b.time_budget)
        .build();

    let mut runs: Vec<(String, PackerConfig)> = [
        Heuristic::BottomLeft,
        Heuristic::BestAreaFit,
        Heuristic::BestLongSideFit,
        Heuristic::BestShortSideFit,
        Heuristic::Linear,
    ]
    .into_iter()
    .map(|h| {
        (
            h.method_name().to_string(),
            PackerConfig {
                heuristic: h,
                ..base.clone()
            },
        )
    })
    .collect();
    let auto_mode: AutoMode = b.auto_mode.parse()?;
    runs.push((
        format!("auto ({})", b.auto_mode.to_ascii_lowercase()),
        PackerConfig {
            auto_mode: Some(auto_mode),
            ..base.clone()
        },
    ));

    for (name, cfg) in runs {
        let start = Instant::now();
        match pack_rectangles(items.clone(), &cfg) {
            Ok(out) => {
                let dur = start.elapsed();
                let stats = out.stats();
                println!(
                    "{:<22} bins={} occupancy={:.2}% time={}",
                    name,
                    stats.num_bins,
                    stats.occupancy * 100.0,
                    bench_fmt_dur(dur)
                );
            }
            Err(e) => println!("{:<22} failed: {}", name, e),
        }
    }
    Ok(())
}

fn bench_fmt_dur(d: Duration) -> String {
    let ms = d.as_secs_f64() * 1000.0;
    if ms >= 1.0 {
        format!("{:.1}ms", ms)
    } else {
        format!("{}us", d.as_micros())
    }
}

fn base_config(cli: &PackArgs) -> anyhow::Result<PackerConfig> {
    let (heuristic, auto_mode) = match cli.heuristic.to_ascii_lowercase().as_str() {
        "auto" => (
            Heuristic::BestAreaFit,
            Some(
                cli.auto_mode
                    .parse::<AutoMode>()
                    .with_context(|| format!("unknown auto mode: {}", cli.auto_mode))?,
            ),
        ),
        _ => (cli.heuristic.parse::<Heuristic>()?, None),
    };
    let flip_trigger: FlipTrigger = cli.flip_trigger.parse()?;
    Ok(PackerConfig {
        bin_width: cli.bin_width,
        bin_height: cli.bin_height,
        allow_flip: cli.allow_flip,
        left_border: cli.left_border,
        bottom_border: cli.bottom_border,
        heuristic,
        flip_trigger,
        auto_mode,
        time_budget_ms: cli.time_budget,
        parallel: cli.parallel,
    })
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}

/// One entry of the item list. `count` repeats the entry.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ItemSpec {
    width: u32,
    height: u32,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    data: Option<serde_json::Value>,
    /// noflip | allowflip | forceflip
    #[serde(default)]
    flip: Option<String>,
    #[serde(default = "default_count")]
    count: usize,
    #[serde(default)]
    window: Option<WindowSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WindowSpec {
    bottom: u32,
    left: u32,
    top: Option<u32>,
    right: Option<u32>,
    #[serde(default = "default_hollow")]
    hollow: bool,
}

fn default_count() -> usize {
    1
}

fn default_hollow() -> bool {
    true
}

impl ItemSpec {
    fn into_rectangle(self) -> anyhow::Result<Rectangle> {
        let mut rect = match &self.window {
            Some(w) => {
                let mut borders = Borders::new(w.bottom, w.left);
                if let Some(top) = w.top {
                    borders = borders.with_top(top);
                }
                if let Some(right) = w.right {
                    borders = borders.with_right(right);
                }
                Rectangle::windowed(self.width, self.height, borders)?.with_hollow(w.hollow)
            }
            None => Rectangle::new(self.width, self.height)?,
        };
        if let Some(flip) = &self.flip {
            rect = rect.with_flip(flip.parse::<FlipPolicy>()?);
        }
        if let Some(label) = self.label {
            rect = rect.with_label(label);
        }
        if let Some(data) = self.data {
            rect = rect.with_data(data);
        }
        Ok(rect)
    }
}

fn is_yaml(p: &Path) -> bool {
    p.extension()
        .and_then(|s| s.to_str())
        .map(|e| matches!(e.to_ascii_lowercase().as_str(), "yaml" | "yml"))
        .unwrap_or(false)
}

fn load_items(path: &Path) -> anyhow::Result<Vec<Rectangle>> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let specs: Vec<ItemSpec> = if is_yaml(path) {
        serde_yaml::from_str(&text).with_context(|| format!("parse {}", path.display()))?
    } else {
        serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))?
    };

    let mut items = Vec::new();
    for (idx, spec) in specs.into_iter().enumerate() {
        let count = spec.count;
        if count == 0 {
            warn!(item = idx, "count is 0, skipping");
            continue;
        }
        let rect = spec
            .into_rectangle()
            .with_context(|| format!("item #{idx} in {}", path.display()))?;
        items.extend(std::iter::repeat_n(rect, count));
    }
    Ok(items)
}

fn load_vis_options(cli: &PackArgs) -> anyhow::Result<VisualisationOptions> {
    let mut opts = match &cli.vis_config {
        Some(path) => {
            let text =
                fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
            if is_yaml(path) {
                serde_yaml::from_str(&text)
                    .with_context(|| format!("parse {}", path.display()))?
            } else {
                serde_json::from_str(&text)
                    .with_context(|| format!("parse {}", path.display()))?
            }
        }
        None => VisualisationOptions::default(),
    };
    if let Some(font) = &cli.font {
        opts.font = Some(font.clone());
    }
    if let Some(size) = cli.font_size {
        opts.font_size = size;
    }
    Ok(opts)
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct YamlConfig {
    bin_width: Option<u32>,
    bin_height: Option<u32>,
    allow_flip: Option<bool>,
    left_border: Option<u32>,
    bottom_border: Option<u32>,
    /// A heuristic name, or `auto` for the portfolio
    heuristic: Option<String>,
    flip_trigger: Option<String>,
    /// fast | quality | none
    auto_mode: Option<String>,
    time_budget_ms: Option<u64>,
    parallel: Option<bool>,
}

impl YamlConfig {
    fn into_packer_config(self, mut cfg: PackerConfig) -> anyhow::Result<PackerConfig> {
        if let Some(v) = self.bin_width {
            cfg.bin_width = v;
        }
        if let Some(v) = self.bin_height {
            cfg.bin_height = v;
        }
        if let Some(v) = self.allow_flip {
            cfg.allow_flip = v;
        }
        if let Some(v) = self.left_border {
            cfg.left_border = v;
        }
        if let Some(v) = self.bottom_border {
            cfg.bottom_border = v;
        }
        if let Some(v) = self.heuristic {
            if v.eq_ignore_ascii_case("auto") {
                cfg.auto_mode = Some(cfg.auto_mode.unwrap_or(AutoMode::Quality));
            } else {
                cfg.heuristic = v.parse::<Heuristic>().context("config key `heuristic`")?;
                cfg.auto_mode = None;
            }
        }
        if let Some(v) = self.flip_trigger {
            cfg.flip_trigger = v.parse::<FlipTrigger>().context("config key `flip_trigger`")?;
        }
        if let Some(v) = self.auto_mode {
            cfg.auto_mode = match v.to_ascii_lowercase().as_str() {
                "none" | "off" => None,
                other => Some(other.parse::<AutoMode>().context("config key `auto_mode`")?),
            };
        }
        if let Some(v) = self.time_budget_ms {
            cfg.time_budget_ms = Some(v);
        }
        if let Some(v) = self.parallel {
            cfg.parallel = v;
        }
        Ok(cfg)
    }
}
