//! walle: run Wall-E programs from the command line

mod screen;
mod terminal;

use std::borrow::Cow;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use thiserror::Error;

use pixel_walle::lang::{
    parse_source, Color, ExecutionState, Flow, Interpreter, Lexer, Observer, PenState, PixelCanvas, Program,
    RunOptions, RunView, SixelEncoder, TokenKind, YieldReason,
};

use screen::Screen;
use terminal::Terminal;

/// Rough width of a terminal column in pixels, for sizing sixel output
const SIXEL_COLUMN_PIXELS: usize = 8;
const MAX_SIXEL_SCALE: usize = 16;

#[derive(Parser)]
#[command(name = "walle")]
#[command(about = "Interpreter for the Wall-E pixel drawing language", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a program and show the canvas
    Run(RunArgs),

    /// Print the token stream of a source file
    Tokens {
        file: PathBuf,
    },

    /// Parse a source file and print its statements
    Ast {
        file: PathBuf,

        /// Print the syntax tree structure instead of source form
        #[arg(long)]
        debug: bool,
    },

    /// List the named colors
    Colors,
}

#[derive(Args)]
struct RunArgs {
    file: PathBuf,

    /// Canvas side length in pixels
    #[arg(long, default_value_t = 32, value_parser = clap::value_parser!(u32).range(1..=4096))]
    size: u32,

    /// Pixel scale (fits the terminal width when omitted)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_SIXEL_SCALE as i64))]
    scale: Option<u32>,

    /// How to show the canvas
    #[arg(long, value_enum, default_value_t = RenderMode::Auto)]
    render: RenderMode,

    /// Pause before every statement
    #[arg(long)]
    step: bool,

    /// Pause before statement N (1-based); may be repeated
    #[arg(long = "break", value_name = "N")]
    breakpoints: Vec<usize>,

    /// Redraw the canvas after every drawing statement
    #[arg(long)]
    animate: bool,

    /// Milliseconds between animation frames
    #[arg(long, default_value_t = 40)]
    delay: u64,

    /// Log runtime errors and continue with the next statement
    #[arg(long)]
    keep_going: bool,

    /// Stop after this many executed statements
    #[arg(long, value_name = "N")]
    max_steps: Option<usize>,

    /// Put the final canvas on the clipboard as an image
    #[arg(long)]
    copy: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum RenderMode {
    Auto,
    Sixel,
    Ansi,
    #[value(name = "none")]
    Off,
}

impl RenderMode {
    /// Pick a concrete mode for `Auto` from the output terminal
    fn resolve(self) -> RenderMode {
        match self {
            RenderMode::Auto if !terminal::is_tty() => RenderMode::Off,
            RenderMode::Auto if SixelEncoder::terminal_supports_sixel() => RenderMode::Sixel,
            RenderMode::Auto => RenderMode::Ansi,
            other => other,
        }
    }

    fn default_scale(self, side: usize, columns: usize) -> usize {
        match self {
            RenderMode::Sixel => (columns * SIXEL_COLUMN_PIXELS / side.max(1)).clamp(1, MAX_SIXEL_SCALE),
            _ => Screen::fit_scale(side, columns),
        }
    }
}

#[derive(Error, Debug)]
enum CliError {
    #[error("cannot read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("{0} syntax error(s)")]
    Syntax(usize),

    #[error("execution failed with {0} error(s)")]
    Runtime(usize),

    #[error("breakpoint {0} is not a statement number (1..={1})")]
    Breakpoint(usize, usize),
}

fn read_source(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Answers interpreter yields: prompts on step and breakpoints, draws frames
/// while animating
struct Host<'p> {
    program: &'p Program,
    render: RenderMode,
    scale: usize,
    delay: Duration,
    terminal: Option<Terminal>,
    screen: Screen,
    sixel: SixelEncoder,
    error: Option<io::Error>,
}

impl<'p> Host<'p> {
    fn new(program: &'p Program, render: RenderMode, scale: usize, delay: Duration, animate: bool) -> io::Result<Self> {
        let terminal = if animate && render != RenderMode::Off {
            Some(Terminal::new()?)
        } else {
            None
        };
        Ok(Self {
            program,
            render,
            scale,
            delay,
            terminal,
            screen: Screen::new(),
            sixel: SixelEncoder::new(),
            error: None,
        })
    }

    fn pause(&mut self, reason: YieldReason, pc: usize, view: &RunView<'_>) -> io::Result<Flow> {
        let kind = match reason {
            YieldReason::Breakpoint(_) => "break",
            _ => "step",
        };
        let stmt = self
            .program
            .statements
            .get(pc)
            .map(|s| s.to_string())
            .unwrap_or_default();

        let mut err = io::stderr().lock();
        writeln!(err, "[{}] statement {}: {}", kind, pc + 1, stmt)?;
        writeln!(
            err,
            "    pen at ({}, {}), brush {} size {}",
            view.pen.x, view.pen.y, view.pen.brush_color, view.pen.brush_size
        )?;
        for (name, value) in view.symbols.entries() {
            writeln!(err, "    {} = {}", name, value)?;
        }
        write!(err, "Enter to continue, q to stop: ")?;
        err.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(Flow::Continue);
        }
        if line.trim().eq_ignore_ascii_case("q") {
            Ok(Flow::Stop)
        } else {
            Ok(Flow::Continue)
        }
    }

    fn frame(&mut self, view: &RunView<'_>) -> io::Result<()> {
        let Some(term) = self.terminal.as_mut() else {
            return Ok(());
        };
        match self.render {
            RenderMode::Sixel => {
                term.goto(1, 1)?;
                term.write_raw(self.sixel.encode(view.canvas, self.scale))?;
                term.flush()?;
            }
            _ => {
                self.screen.draw(view.canvas, self.scale);
                self.screen.flush(term)?;
            }
        }
        thread::sleep(self.delay);
        Ok(())
    }

    /// Clear the animation area and report the first I/O failure, if any
    fn finish(mut self) -> io::Result<()> {
        if let Some(term) = self.terminal.as_mut() {
            term.clear()?;
            term.goto(1, 1)?;
            term.flush()?;
        }
        match self.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Observer for Host<'_> {
    fn on_yield(&mut self, reason: YieldReason, view: &RunView<'_>) -> Flow {
        let result = match reason {
            YieldReason::Stepped(pc) | YieldReason::Breakpoint(pc) => self.pause(reason, pc, view),
            YieldReason::CanvasChanged(_) => self.frame(view).map(|_| Flow::Continue),
        };
        match result {
            Ok(flow) => flow,
            Err(e) => {
                log::warn!("host I/O failed, stopping: {}", e);
                self.error = Some(e);
                Flow::Stop
            }
        }
    }
}

fn run(args: RunArgs) -> Result<(), CliError> {
    let source = read_source(&args.file)?;
    let (program, errors) = parse_source(&source);
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{}", e);
        }
        return Err(CliError::Syntax(errors.len()));
    }

    for &n in &args.breakpoints {
        if n == 0 || n > program.len() {
            return Err(CliError::Breakpoint(n, program.len()));
        }
    }

    let side = args.size as usize;
    let render = args.render.resolve();
    let columns = terminal::query_size().map_or(80, |(cols, _)| cols as usize);
    let scale = args
        .scale
        .map_or_else(|| render.default_scale(side, columns), |scale| scale as usize);
    log::debug!("render {:?} at scale {}", render, scale);

    let interpreter = Interpreter::with_options(RunOptions {
        step: args.step,
        breakpoints: args.breakpoints.iter().map(|n| n - 1).collect(),
        animate: args.animate,
        keep_going: args.keep_going,
        max_steps: args.max_steps,
    });

    let mut canvas = PixelCanvas::new(side);
    let mut pen = PenState::new();
    let mut host = Host::new(&program, render, scale, Duration::from_millis(args.delay), args.animate)?;
    let report = interpreter.execute_observed(
        &program,
        &mut canvas,
        &mut pen,
        |reason: YieldReason, view: &RunView<'_>| host.on_yield(reason, view),
    );
    host.finish()?;

    {
        let mut out = io::stdout().lock();
        for line in &report.output_log {
            writeln!(out, "{}", line)?;
        }
        for line in &report.error_log {
            eprintln!("{}", line);
        }

        match render {
            RenderMode::Sixel => writeln!(out, "{}", SixelEncoder::new().encode(&canvas, scale))?,
            RenderMode::Ansi => {
                let mut screen = Screen::new();
                screen.draw(&canvas, scale);
                write!(out, "{}", screen.to_ansi())?;
            }
            RenderMode::Auto | RenderMode::Off => {}
        }
        out.flush()?;
    }

    if args.copy {
        copy_to_clipboard(&canvas);
    }

    match report.state {
        ExecutionState::HaltedSuccess | ExecutionState::Stopped => Ok(()),
        _ => Err(CliError::Runtime(report.error_log.len())),
    }
}

/// Place the canvas on the system clipboard; skipped when there is none
fn copy_to_clipboard(canvas: &PixelCanvas) {
    let Some(mut clipboard) = arboard::Clipboard::new().ok() else {
        log::warn!("no clipboard available, --copy ignored");
        return;
    };
    let image = arboard::ImageData {
        width: canvas.side(),
        height: canvas.side(),
        bytes: Cow::from(canvas.rgba()),
    };
    if let Err(e) = clipboard.set_image(image) {
        log::warn!("copy to clipboard failed: {}", e);
    }
}

fn tokens(file: &Path) -> Result<(), CliError> {
    let source = read_source(file)?;
    let tokens = Lexer::new(&source).tokenize();

    let mut out = io::stdout().lock();
    let mut illegal = 0;
    for token in &tokens {
        match &token.kind {
            TokenKind::Illegal(message) => {
                illegal += 1;
                writeln!(out, "{:>4}:{:<4} ILLEGAL {:?}: {}", token.line, token.column, token.lexeme, message)?;
            }
            kind => writeln!(out, "{:>4}:{:<4} {}", token.line, token.column, kind)?,
        }
    }

    if illegal > 0 {
        return Err(CliError::Syntax(illegal));
    }
    Ok(())
}

fn ast(file: &Path, debug: bool) -> Result<(), CliError> {
    let source = read_source(file)?;
    let (program, errors) = parse_source(&source);

    let mut out = io::stdout().lock();
    if debug {
        writeln!(out, "{:#?}", program)?;
    } else {
        for (idx, stmt) in program.statements.iter().enumerate() {
            writeln!(out, "{:>4}  {}", idx + 1, stmt)?;
        }
    }

    for e in &errors {
        eprintln!("{}", e);
    }
    if !errors.is_empty() {
        return Err(CliError::Syntax(errors.len()));
    }
    Ok(())
}

fn colors() -> Result<(), CliError> {
    let swatches = terminal::is_tty();
    let mut out = io::stdout().lock();
    for color in Color::ALL {
        let [r, g, b, a] = color.rgba();
        write!(out, "{:>2}  {:<12} #{:02x}{:02x}{:02x}{:02x}", color.index(), color.name(), r, g, b, a)?;
        if swatches {
            write!(out, "  \x1b[{}m    \x1b[0m", terminal::to_bg_sgr(color))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run(args) => run(args),
        Commands::Tokens { file } => tokens(&file),
        Commands::Ast { file, debug } => ast(&file, debug),
        Commands::Colors => colors(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("walle: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_run_flags() {
        let cli = Cli::try_parse_from([
            "walle", "run", "art.pw", "--size", "16", "--render", "none", "--break", "3", "--break", "5", "--step",
        ])
        .expect("parse");
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.size, 16);
        assert_eq!(args.render, RenderMode::Off);
        assert_eq!(args.breakpoints, vec![3, 5]);
        assert!(args.step);
        assert!(!args.animate);
    }

    #[test]
    fn test_cli_rejects_zero_size() {
        assert!(Cli::try_parse_from(["walle", "run", "art.pw", "--size", "0"]).is_err());
    }

    #[test]
    fn test_cli_bounds_scale() {
        assert!(Cli::try_parse_from(["walle", "run", "art.pw", "--scale", "0"]).is_err());
        assert!(Cli::try_parse_from(["walle", "run", "art.pw", "--scale", "18446744073709551615"]).is_err());
        let cli = Cli::try_parse_from(["walle", "run", "art.pw", "--scale", "16"]).expect("parse");
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.scale, Some(16));
    }

    #[test]
    fn test_default_scale() {
        assert_eq!(RenderMode::Ansi.default_scale(32, 80), 2);
        assert_eq!(RenderMode::Sixel.default_scale(32, 80), 16);
        assert_eq!(RenderMode::Sixel.default_scale(256, 80), 2);
        assert_eq!(RenderMode::Sixel.default_scale(4096, 80), 1);
    }
}
