use std::fs;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use serde::Serialize;

use mandelbrot_engine::cli::{BenchArgs, Cli, Command, RenderArgs, VerifyArgs, ViewArgs};
use mandelbrot_engine::render::save_png;
use mandelbrot_engine::timing::{timed, FrameTimer, FrameTiming, PerfRecord, PerfSuite, PerfTest};
use mandelbrot_engine::{
    EngineConfig, EngineVariant, Kernel, MandelbrotContext, Position, Viewport,
};

/// JSON form of one `bench` run
#[derive(Debug, Serialize)]
struct BenchReport {
    timestamp: String,
    width: u32,
    height: u32,
    config: EngineConfig,
    viewport: Viewport,
    warmup: usize,
    cycles: usize,
    results: Vec<PerfRecord>,
}

fn main() -> Result<ExitCode> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Render(args) => run_render(&args),
        Command::Bench(args) => run_bench(&args),
        Command::Verify(args) => run_verify(&args),
    }
}

// === Setup ===

/// Context for the requested screen: defaults, then position file, then flags
fn build_context(view: &ViewArgs) -> Result<MandelbrotContext> {
    let mut ctx = MandelbrotContext::with_config(view.width, view.height, view.engine_config())?;

    if let Some(path) = &view.position {
        let position = Position::load(path)
            .with_context(|| format!("Failed to load position file: {}", path.display()))?;
        ctx.apply_position(&position)?;
    }

    let mut viewport = ctx.viewport();
    if let Some(x) = view.center_x {
        viewport.center_x = x;
    }
    if let Some(y) = view.center_y {
        viewport.center_y = y;
    }
    if let Some(plot_width) = view.plot_width {
        viewport.scale = plot_width / f64::from(view.width);
    }
    if let Some(cap) = view.iterations {
        viewport.iteration_cap = cap;
    }
    ctx.set_viewport(viewport)?;

    Ok(ctx)
}

fn print_options_info(ctx: &MandelbrotContext, threads: usize) {
    let view = ctx.viewport();
    let config = ctx.config();

    println!("╔════════════════════════════════════════════════╗");
    println!("║  Options                                       ║");
    println!("╠════════════════════════════════════════════════╣");
    println!("║ Screen:        {:>31} ║", format!("{}x{}", ctx.width(), ctx.height()));
    println!("║ Precision:     {:>31} ║", config.precision.to_string());
    println!(
        "║ Vector width:  {:>31} ║",
        format!("{} bits ({} lanes)", config.vector_width.bits(), config.vector_width.lanes(config.precision))
    );
    println!("║ Fractal:       {:>31} ║", config.fractal.to_string());
    println!("║ Center:        {:>31} ║", format!("({}, {})", view.center_x, view.center_y));
    println!("║ Plot width:    {:>31} ║", format!("{:e}", view.plot_width(ctx.width())));
    println!("║ Iteration cap: {:>31} ║", view.iteration_cap);
    println!("║ Threads:       {:>31} ║", threads);
    println!("╚════════════════════════════════════════════════╝");
}

// === Commands ===

fn run_render(args: &RenderArgs) -> Result<ExitCode> {
    let mut ctx = build_context(&args.view)?;
    let variant = args.variant();

    let mut timer = FrameTimer::new();
    let mut timing = FrameTiming::default();
    for _ in 0..args.frames {
        let (computed, compute) = timed(|| ctx.compute(variant));
        computed?;
        let ((), colorize) = timed(|| ctx.colorize());
        timing = FrameTiming { compute, colorize };
        timer.tick();
    }

    save_png(&ctx, &args.output)?;
    println!(
        "{} frame {}x{}: compute {:.3} ms, color {:.3} ms ({:.1} fps) -> {}",
        variant,
        ctx.width(),
        ctx.height(),
        timing.compute.as_secs_f64() * 1000.0,
        timing.colorize.as_secs_f64() * 1000.0,
        timing.fps(),
        args.output.display()
    );
    if let Some(average) = timer.average().filter(|_| timer.frames() > 1) {
        println!(
            "{} frames, average {:.3} ms ({:.1} fps)",
            timer.frames(),
            average.as_secs_f64() * 1000.0,
            1.0 / average.as_secs_f64()
        );
    }

    if let Some(path) = &args.save_position {
        ctx.position()
            .save(path)
            .with_context(|| format!("Failed to save position file: {}", path.display()))?;
        println!("Position saved to {}", path.display());
    }

    Ok(ExitCode::SUCCESS)
}

fn run_bench(args: &BenchArgs) -> Result<ExitCode> {
    let mut ctx = build_context(&args.view)?;
    print_options_info(&ctx, args.threads);

    let title = format!("{} frame, {} cycles", ctx.config(), args.cycles);
    let mut suite = PerfSuite::new(&title);

    for variant in EngineVariant::all(args.threads) {
        log::info!("benchmarking {variant}");
        let result = PerfTest::new(&variant.to_string())
            .with_warmup(args.warmup)
            .with_iterations(args.cycles)
            .try_run(|| ctx.compute(variant))?;
        suite.add_result(result);
    }
    suite.print_comparison();

    if let Some(fastest) = suite.find_fastest() {
        let pixels = ctx.pixel_count();
        println!(
            "Fastest: {} ({:.1} Mpixel/s)",
            fastest.name,
            fastest.throughput(pixels) / 1e6
        );
    }

    if let Some(path) = &args.json {
        let report = BenchReport {
            timestamp: Local::now().to_rfc3339(),
            width: ctx.width(),
            height: ctx.height(),
            config: ctx.config(),
            viewport: ctx.viewport(),
            warmup: args.warmup,
            cycles: args.cycles,
            results: suite.records(),
        };
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write bench report: {}", path.display()))?;
        println!("Report written to {}", path.display());
    }

    Ok(ExitCode::SUCCESS)
}

fn run_verify(args: &VerifyArgs) -> Result<ExitCode> {
    let mut ctx = build_context(&args.view)?;
    print_options_info(&ctx, args.threads);

    ctx.compute(EngineVariant::Scalar)?;
    let reference = ctx.escape_counts().to_vec();

    let singles = Kernel::ALL.iter().map(|&kernel| EngineVariant::from(kernel));
    let threaded = Kernel::ALL.iter().map(|&kernel| EngineVariant::Threaded {
        threads: args.threads,
        kernel,
    });
    let variants: Vec<_> = singles.chain(threaded).collect();

    let mut mismatches = 0;
    for variant in variants {
        ctx.compute(variant)?;
        let first_diff = reference
            .iter()
            .zip(ctx.escape_counts())
            .position(|(expected, actual)| expected != actual);

        match first_diff {
            None => println!("  {:<32} OK", variant.to_string()),
            Some(index) => {
                mismatches += 1;
                let width = ctx.width() as usize;
                println!(
                    "  {:<32} MISMATCH at ({}, {}): expected {}, got {}",
                    variant.to_string(),
                    index % width,
                    index / width,
                    reference[index],
                    ctx.escape_counts()[index]
                );
            }
        }
    }

    if mismatches == 0 {
        println!("All engines match the scalar reference");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("{mismatches} engine(s) differ from the scalar reference");
        Ok(ExitCode::FAILURE)
    }
}
