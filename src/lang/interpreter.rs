//! Wall-E interpreter with generator-based execution for step/break/animate

use std::cell::RefCell;

use genawaiter::rc::{Co, Gen};
use genawaiter::GeneratorState;

use crate::lang::ast::{BinOp, Expr, Program, Stmt, UnaryOp};
use crate::lang::builtins;
use crate::lang::error::RuntimeError;
use crate::lang::graphics::{self, Canvas, PenState};
use crate::lang::operators::{apply_binary, negate};
use crate::lang::runtime::RuntimeEnvironment;
use crate::lang::symbols::SymbolTable;
use crate::lang::value::{Color, Value};

/// Past this many logged runtime errors the run is abandoned
pub const MAX_RUNTIME_ERRORS: usize = 100;

/// Where a run ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionState {
    Running,
    HaltedSuccess,
    HaltedError,
    /// The host answered `Flow::Stop` at a yield
    Stopped,
}

/// Why the interpreter yielded control. Carries the 0-based statement index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YieldReason {
    /// Step mode, about to execute the statement
    Stepped(usize),
    /// Breakpoint on the statement, about to execute it
    Breakpoint(usize),
    /// A drawing statement just finished (animation mode)
    CanvasChanged(usize),
}

/// The host's answer at a yield
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Run configuration
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Yield before every statement
    pub step: bool,
    /// 0-based statement indices to yield before
    pub breakpoints: Vec<usize>,
    /// Yield after every statement that draws
    pub animate: bool,
    /// Log runtime errors and carry on with the next statement, up to
    /// `MAX_RUNTIME_ERRORS`
    pub keep_going: bool,
    /// Abort after this many executed statements
    pub max_steps: Option<usize>,
}

/// Logs and final state of a run
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionReport {
    pub output_log: Vec<String>,
    pub error_log: Vec<String>,
    pub state: ExecutionState,
    /// Statements executed
    pub steps: usize,
}

impl ExecutionReport {
    pub fn succeeded(&self) -> bool {
        self.state == ExecutionState::HaltedSuccess
    }
}

/// Read-only view of a suspended run
pub struct RunView<'a> {
    pub canvas: &'a dyn Canvas,
    pub pen: &'a PenState,
    pub symbols: &'a SymbolTable,
    pub output_log: &'a [String],
    pub error_log: &'a [String],
}

/// Receives every yield of a run and decides whether it goes on
pub trait Observer {
    fn on_yield(&mut self, reason: YieldReason, view: &RunView<'_>) -> Flow;
}

impl<F> Observer for F
where
    F: FnMut(YieldReason, &RunView<'_>) -> Flow,
{
    fn on_yield(&mut self, reason: YieldReason, view: &RunView<'_>) -> Flow {
        self(reason, view)
    }
}

/// Everything a run mutates, shared between the generator and its driver
struct Machine<'a> {
    canvas: &'a mut dyn Canvas,
    pen: &'a mut PenState,
    symbols: SymbolTable,
    env: RuntimeEnvironment,
    output_log: Vec<String>,
    error_log: Vec<String>,
    state: ExecutionState,
    steps: usize,
}

impl<'a> Machine<'a> {
    fn new(canvas: &'a mut dyn Canvas, pen: &'a mut PenState) -> Self {
        Self {
            canvas,
            pen,
            symbols: SymbolTable::new(),
            env: RuntimeEnvironment::new(),
            output_log: Vec::new(),
            error_log: Vec::new(),
            state: ExecutionState::Running,
            steps: 0,
        }
    }

    fn view(&self) -> RunView<'_> {
        RunView {
            canvas: &*self.canvas,
            pen: &*self.pen,
            symbols: &self.symbols,
            output_log: &self.output_log,
            error_log: &self.error_log,
        }
    }

    fn output(&mut self, line: String) {
        self.output_log.push(line);
    }

    /// Log an error raised by the statement at `pc`
    fn record_error(&mut self, pc: usize, err: &RuntimeError) {
        log::warn!("statement {}: {}", pc + 1, err);
        let entry = match err {
            RuntimeError::Internal(msg) => {
                format!("Interpreter Internal Error (Statement {}): {}", pc + 1, msg)
            }
            other => format!("Runtime Error (Statement {}): {}", pc + 1, other),
        };
        self.error_log.push(entry);
    }

    /// Reset the pen, build the label table and check the program opens with
    /// Spawn. Returns false when the run cannot start.
    fn prepare(&mut self, program: &Program) -> bool {
        self.pen.reset();

        if let Err(e) = self.env.scan_labels(program) {
            log::warn!("preprocessing: {}", e);
            self.error_log.push(format!("Preprocessing Error: {}", e));
            return false;
        }

        if !matches!(program.statements.first(), Some(Stmt::Spawn { .. })) {
            self.record_error(0, &RuntimeError::MissingSpawn);
            return false;
        }

        true
    }

    fn finish(&mut self) {
        if self.state == ExecutionState::Running {
            self.state = if self.error_log.is_empty() {
                ExecutionState::HaltedSuccess
            } else {
                ExecutionState::HaltedError
            };
        }

        let summary = match self.state {
            ExecutionState::HaltedSuccess => "Program execution completed.".to_string(),
            ExecutionState::Stopped => "Program execution stopped.".to_string(),
            _ => format!(
                "Program execution finished with {} error(s).",
                self.error_log.len()
            ),
        };
        self.output(summary);
        log::info!("run finished: {:?} after {} statement(s)", self.state, self.steps);
    }

    fn into_report(self) -> ExecutionReport {
        ExecutionReport {
            output_log: self.output_log,
            error_log: self.error_log,
            state: self.state,
            steps: self.steps,
        }
    }

    /// Execute one statement and move the program counter
    fn step(&mut self, stmt: &Stmt) -> Result<(), RuntimeError> {
        self.steps += 1;
        self.execute_stmt(stmt)?;
        self.env.advance()
    }

    fn execute_stmt(&mut self, stmt: &Stmt) -> Result<(), RuntimeError> {
        match stmt {
            Stmt::Spawn { x, y } => {
                let x = self.eval(x)?.expect_int("Spawn x")?;
                let y = self.eval(y)?.expect_int("Spawn y")?;
                if self.pen.spawned {
                    return Err(RuntimeError::AlreadySpawned);
                }
                self.require_on_canvas(x, y)?;
                self.pen.x = x;
                self.pen.y = y;
                self.pen.spawned = true;
                self.output(format!("Wall-E spawned at ({}, {}).", x, y));
            }

            Stmt::Color(expr) => {
                let value = self.eval(expr)?;
                let name = value.expect_text("Color")?;
                let color = Color::from_name(name)
                    .ok_or_else(|| RuntimeError::UnknownColor(name.to_string()))?;
                self.pen.brush_color = color;
                self.output(format!("Brush color set to {}.", color));
            }

            Stmt::Size(expr) => {
                let size = self.eval(expr)?.expect_int("Size")?;
                if size < 1 {
                    return Err(RuntimeError::InvalidArgument(format!(
                        "Size must be a positive integer, got {}",
                        size
                    )));
                }
                let size = if size % 2 == 0 { size - 1 } else { size };
                self.pen.brush_size = size;
                self.output(format!("Brush size set to {}.", size));
            }

            Stmt::DrawLine { dx, dy, dist } => {
                let (dx, dy) = self.direction("DrawLine", dx, dy)?;
                let dist = self.eval(dist)?.expect_int("DrawLine distance")?;
                if dist < 0 {
                    return Err(RuntimeError::InvalidArgument(format!(
                        "DrawLine distance must not be negative, got {}",
                        dist
                    )));
                }
                self.require_spawned()?;

                let end = self.offset(dx, dy, dist)?;
                self.require_on_canvas(end.0, end.1)?;

                let start = (self.pen.x, self.pen.y);
                if !self.pen.brush_color.is_transparent() {
                    graphics::line(
                        self.canvas,
                        start,
                        (dx, dy),
                        dist,
                        self.pen.brush_size,
                        self.pen.brush_color,
                    );
                    self.canvas.notify_changed();
                }
                self.move_pen(end);
                self.output(format!(
                    "Line from ({}, {}) to ({}, {}).",
                    start.0, start.1, end.0, end.1
                ));
            }

            Stmt::DrawCircle { dx, dy, radius } => {
                let (dx, dy) = self.direction("DrawCircle", dx, dy)?;
                let radius = self.eval(radius)?.expect_int("DrawCircle radius")?;
                if radius < 0 {
                    return Err(RuntimeError::InvalidArgument(format!(
                        "DrawCircle radius must not be negative, got {}",
                        radius
                    )));
                }
                self.require_spawned()?;

                let center = self.offset(dx, dy, radius)?;
                if !self.pen.brush_color.is_transparent() {
                    graphics::circle(
                        self.canvas,
                        center.0,
                        center.1,
                        radius,
                        self.pen.brush_size,
                        self.pen.brush_color,
                    );
                    self.canvas.notify_changed();
                }
                self.move_pen(center);
                self.output(format!(
                    "Circle of radius {} around ({}, {}).",
                    radius, center.0, center.1
                ));
            }

            Stmt::DrawRectangle {
                dx,
                dy,
                dist,
                width,
                height,
            } => {
                let (dx, dy) = self.direction("DrawRectangle", dx, dy)?;
                let dist = self.eval(dist)?.expect_int("DrawRectangle distance")?;
                let width = self.eval(width)?.expect_int("DrawRectangle width")?;
                let height = self.eval(height)?.expect_int("DrawRectangle height")?;
                if dist <= 0 || width <= 0 || height <= 0 {
                    return Err(RuntimeError::InvalidArgument(format!(
                        "DrawRectangle distance, width and height must be positive, got {}, {}, {}",
                        dist, width, height
                    )));
                }
                self.require_spawned()?;

                let center = self.offset(dx, dy, dist)?;
                if !self.pen.brush_color.is_transparent() {
                    graphics::rectangle_outline(
                        self.canvas,
                        center.0,
                        center.1,
                        width,
                        height,
                        self.pen.brush_size,
                        self.pen.brush_color,
                    );
                    self.canvas.notify_changed();
                }
                self.move_pen(center);
                self.output(format!(
                    "Rectangle {}x{} around ({}, {}).",
                    width, height, center.0, center.1
                ));
            }

            Stmt::Fill => {
                self.require_spawned()?;
                let changed = if self.pen.brush_color.is_transparent() {
                    0
                } else {
                    graphics::flood_fill(self.canvas, self.pen.x, self.pen.y, self.pen.brush_color)
                };
                if changed > 0 {
                    self.canvas.notify_changed();
                }
                self.output(format!(
                    "Fill at ({}, {}) changed {} pixel(s).",
                    self.pen.x, self.pen.y, changed
                ));
            }

            Stmt::Assignment(name, expr) => {
                let value = self.eval(expr)?;
                self.output(format!("{} <- {}", name, value));
                self.symbols.assign(name, value);
            }

            Stmt::Label(_) => {}

            Stmt::GoTo { label, condition } => {
                let jump = match condition {
                    Some(cond) => self.eval(cond)?.truthy()?,
                    None => true,
                };
                if jump {
                    self.env.request_jump(label)?;
                    self.output(format!("GoTo [{}]: jump.", label));
                } else {
                    self.output(format!("GoTo [{}]: condition false, no jump.", label));
                }
            }
        }
        Ok(())
    }

    fn require_spawned(&self) -> Result<(), RuntimeError> {
        if self.pen.spawned {
            Ok(())
        } else {
            Err(RuntimeError::NotSpawned)
        }
    }

    fn require_on_canvas(&self, x: i32, y: i32) -> Result<(), RuntimeError> {
        if self.canvas.contains(x, y) {
            Ok(())
        } else {
            Err(RuntimeError::OutOfCanvas {
                x,
                y,
                size: self.canvas.size(),
            })
        }
    }

    /// Evaluate a direction pair; each component must be -1, 0 or 1
    fn direction(&self, command: &str, dx: &Expr, dy: &Expr) -> Result<(i32, i32), RuntimeError> {
        let dx = self.eval(dx)?.expect_int(&format!("{} x direction", command))?;
        let dy = self.eval(dy)?.expect_int(&format!("{} y direction", command))?;
        if !(-1..=1).contains(&dx) || !(-1..=1).contains(&dy) {
            return Err(RuntimeError::InvalidArgument(format!(
                "{} direction must be -1, 0 or 1 on each axis, got ({}, {})",
                command, dx, dy
            )));
        }
        Ok((dx, dy))
    }

    /// Pen position moved `distance` times along (dx, dy)
    fn offset(&self, dx: i32, dy: i32, distance: i32) -> Result<(i32, i32), RuntimeError> {
        let x = dx
            .checked_mul(distance)
            .and_then(|d| self.pen.x.checked_add(d))
            .ok_or(RuntimeError::Overflow("pen movement"))?;
        let y = dy
            .checked_mul(distance)
            .and_then(|d| self.pen.y.checked_add(d))
            .ok_or(RuntimeError::Overflow("pen movement"))?;
        Ok((x, y))
    }

    fn move_pen(&mut self, (x, y): (i32, i32)) {
        self.pen.x = x;
        self.pen.y = y;
    }

    /// Evaluate an expression. `&&` and `||` only evaluate their right side
    /// when the left side does not decide the result.
    fn eval(&self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Number(n) => Ok(Value::Int(*n)),
            Expr::Text(s) => Ok(Value::Text(s.clone())),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Variable(name) => self.symbols.get(name).cloned(),
            Expr::UnaryOp(UnaryOp::Neg, operand) => negate(&self.eval(operand)?),
            Expr::BinaryOp(left, BinOp::And, right) => {
                if !self.eval(left)?.truthy()? {
                    return Ok(Value::Bool(false));
                }
                Ok(Value::Bool(self.eval(right)?.truthy()?))
            }
            Expr::BinaryOp(left, BinOp::Or, right) => {
                if self.eval(left)?.truthy()? {
                    return Ok(Value::Bool(true));
                }
                Ok(Value::Bool(self.eval(right)?.truthy()?))
            }
            Expr::BinaryOp(left, op, right) => {
                let l = self.eval(left)?;
                let r = self.eval(right)?;
                apply_binary(*op, &l, &r)
            }
            Expr::FunctionCall(builtin, args) => {
                let values = args
                    .iter()
                    .map(|arg| self.eval(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                builtins::call(*builtin, &values, &*self.canvas, &*self.pen)
            }
        }
    }
}

/// Main program execution loop
async fn execute_program(
    co: &Co<YieldReason, Flow>,
    machine: &RefCell<Machine<'_>>,
    program: &Program,
    options: &RunOptions,
) {
    loop {
        let pc = machine.borrow().env.program_counter;
        let Some(stmt) = program.statements.get(pc) else {
            return;
        };

        let pause = if options.breakpoints.contains(&pc) {
            Some(YieldReason::Breakpoint(pc))
        } else if options.step {
            Some(YieldReason::Stepped(pc))
        } else {
            None
        };
        if let Some(reason) = pause {
            if co.yield_(reason).await == Flow::Stop {
                machine.borrow_mut().state = ExecutionState::Stopped;
                return;
            }
        }

        if let Some(limit) = options.max_steps {
            if machine.borrow().steps >= limit {
                let mut m = machine.borrow_mut();
                m.record_error(pc, &RuntimeError::StepLimit(limit));
                m.state = ExecutionState::HaltedError;
                return;
            }
        }

        log::debug!("[{}] {}", pc + 1, stmt);
        let result = machine.borrow_mut().step(stmt);

        if let Err(err) = result {
            let mut m = machine.borrow_mut();
            m.record_error(pc, &err);
            if !options.keep_going {
                m.state = ExecutionState::HaltedError;
                return;
            }
            if m.error_log.len() > MAX_RUNTIME_ERRORS {
                m.error_log
                    .push("Too many runtime errors. Halting execution.".to_string());
                m.state = ExecutionState::HaltedError;
                return;
            }
            // Skip the failed statement, dropping any jump it asked for
            m.env.resume_at(pc + 1);
        }

        if options.animate && stmt.draws() {
            if co.yield_(YieldReason::CanvasChanged(pc)).await == Flow::Stop {
                machine.borrow_mut().state = ExecutionState::Stopped;
                return;
            }
        }
    }
}

/// Runs programs against a host-owned canvas and pen
#[derive(Debug, Clone, Default)]
pub struct Interpreter {
    options: RunOptions,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: RunOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    pub fn set_breakpoints(&mut self, breakpoints: &[usize]) {
        self.options.breakpoints = breakpoints.to_vec();
    }

    pub fn set_step_mode(&mut self, enabled: bool) {
        self.options.step = enabled;
    }

    pub fn set_animate(&mut self, enabled: bool) {
        self.options.animate = enabled;
    }

    /// Run to completion without pausing. Breakpoints, step and animation
    /// yields are answered with `Flow::Continue`.
    pub fn execute(&self, program: &Program, canvas: &mut dyn Canvas, pen: &mut PenState) -> ExecutionReport {
        self.execute_observed(program, canvas, pen, |_: YieldReason, _: &RunView<'_>| Flow::Continue)
    }

    /// Run, handing every yield to `observer`
    pub fn execute_observed<O: Observer>(
        &self,
        program: &Program,
        canvas: &mut dyn Canvas,
        pen: &mut PenState,
        mut observer: O,
    ) -> ExecutionReport {
        log::info!("run started: {} statement(s)", program.len());

        let mut machine = Machine::new(canvas, pen);
        if !machine.prepare(program) {
            machine.state = ExecutionState::HaltedError;
            machine.finish();
            return machine.into_report();
        }

        let cell = RefCell::new(machine);
        {
            let machine = &cell;
            let options = &self.options;
            let mut gen = Gen::new(|co: Co<YieldReason, Flow>| async move {
                execute_program(&co, machine, program, options).await;
            });

            let mut flow = Flow::Continue;
            while let GeneratorState::Yielded(reason) = gen.resume_with(flow) {
                let m = cell.borrow();
                flow = observer.on_yield(reason, &m.view());
                log::trace!("yield {:?} -> {:?}", reason, flow);
            }
        }

        let mut machine = cell.into_inner();
        machine.finish();
        machine.into_report()
    }
}

/// Run a program with default options
pub fn execute(program: &Program, canvas: &mut dyn Canvas, pen: &mut PenState) -> ExecutionReport {
    Interpreter::new().execute(program, canvas, pen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::graphics::PixelCanvas;
    use crate::lang::parser::parse_source;

    fn parse(code: &str) -> Program {
        let (program, errors) = parse_source(code);
        assert!(errors.is_empty(), "parse errors: {:?}", errors);
        program
    }

    fn run_walle_on(code: &str, canvas: &mut PixelCanvas, pen: &mut PenState) -> ExecutionReport {
        execute(&parse(code), canvas, pen)
    }

    fn run_walle(code: &str) -> (ExecutionReport, PixelCanvas, PenState) {
        let mut canvas = PixelCanvas::new(10);
        let mut pen = PenState::new();
        let report = run_walle_on(code, &mut canvas, &mut pen);
        (report, canvas, pen)
    }

    fn painted(canvas: &PixelCanvas, color: Color) -> Vec<(i32, i32)> {
        let mut points = Vec::new();
        for y in 0..canvas.size() {
            for x in 0..canvas.size() {
                if canvas.get_pixel(x, y) == color {
                    points.push((x, y));
                }
            }
        }
        points
    }

    #[test]
    fn test_spawn_color_line() {
        let (report, canvas, pen) = run_walle("Spawn(2, 3)\nColor(\"red\")\nDrawLine(1, 0, 4)");
        assert!(report.succeeded(), "{:?}", report.error_log);
        assert_eq!((pen.x, pen.y), (6, 3));
        assert_eq!(
            painted(&canvas, Color::Red),
            vec![(2, 3), (3, 3), (4, 3), (5, 3), (6, 3)]
        );
        // The final pixel keeps the brush color
        assert_eq!(canvas.get_pixel(6, 3), Color::Red);
        assert_eq!(report.output_log.last().map(String::as_str), Some("Program execution completed."));
    }

    #[test]
    fn test_first_statement_must_be_spawn() {
        let (report, canvas, _) = run_walle("Color(\"red\")\nSpawn(0, 0)\nFill()");
        assert_eq!(report.state, ExecutionState::HaltedError);
        assert_eq!(report.steps, 0);
        assert_eq!(
            report.error_log,
            vec!["Runtime Error (Statement 1): The first statement of a program must be Spawn"]
        );
        assert!(painted(&canvas, Color::White).len() == 100);
    }

    #[test]
    fn test_spawn_only_once() {
        let (report, _, pen) = run_walle("Spawn(1, 1)\nSpawn(2, 2)\nSize(3)");
        assert_eq!(report.state, ExecutionState::HaltedError);
        assert_eq!(report.error_log.len(), 1);
        assert!(report.error_log[0].starts_with("Runtime Error (Statement 2): Wall-E has already been spawned"));
        assert_eq!((pen.x, pen.y), (1, 1));
        assert_eq!(pen.brush_size, 1);
    }

    #[test]
    fn test_spawn_out_of_bounds() {
        let (report, _, pen) = run_walle("Spawn(10, 0)");
        assert_eq!(report.state, ExecutionState::HaltedError);
        assert!(report.error_log[0].contains("outside the canvas"));
        assert!(!pen.spawned);
    }

    #[test]
    fn test_size_is_forced_odd() {
        let (_, _, pen) = run_walle("Spawn(0, 0)\nSize(4)");
        assert_eq!(pen.brush_size, 3);
        let (_, _, pen) = run_walle("Spawn(0, 0)\nSize(1)");
        assert_eq!(pen.brush_size, 1);
        let (report, _, pen) = run_walle("Spawn(0, 0)\nSize(0)");
        assert_eq!(report.state, ExecutionState::HaltedError);
        assert_eq!(pen.brush_size, 1);
    }

    #[test]
    fn test_directions_are_validated() {
        for dx in -1..=1 {
            for dy in -1..=1 {
                for cmd in ["DrawLine({}, {}, 1)", "DrawCircle({}, {}, 1)", "DrawRectangle({}, {}, 1, 2, 2)"] {
                    let stmt = cmd.replacen("{}", &dx.to_string(), 1).replacen("{}", &dy.to_string(), 1);
                    let (report, _, _) = run_walle(&format!("Spawn(5, 5)\n{}", stmt));
                    assert!(report.succeeded(), "{}: {:?}", stmt, report.error_log);
                }
            }
        }
        for stmt in ["DrawLine(2, 0, 1)", "DrawCircle(0, -2, 1)", "DrawRectangle(1, 5, 1, 2, 2)"] {
            let (report, _, _) = run_walle(&format!("Spawn(5, 5)\n{}", stmt));
            assert_eq!(report.state, ExecutionState::HaltedError, "{}", stmt);
            assert!(report.error_log[0].contains("direction"), "{:?}", report.error_log);
        }
    }

    #[test]
    fn test_line_with_thick_brush() {
        let (report, canvas, _) = run_walle("Spawn(1, 1)\nColor(\"blue\")\nSize(3)\nDrawLine(1, 0, 2)");
        assert!(report.succeeded());
        // 3x3 brush stamped at x = 1, 2, 3
        assert_eq!(painted(&canvas, Color::Blue).len(), 15);
    }

    #[test]
    fn test_line_end_must_be_on_canvas() {
        let (report, canvas, pen) = run_walle("Spawn(8, 0)\nColor(\"red\")\nDrawLine(1, 0, 5)");
        assert_eq!(report.state, ExecutionState::HaltedError);
        assert!(painted(&canvas, Color::Red).is_empty());
        assert_eq!((pen.x, pen.y), (8, 0));
    }

    #[test]
    fn test_transparent_brush_only_moves() {
        let (report, canvas, pen) = run_walle("Spawn(0, 0)\nDrawLine(1, 1, 3)\nDrawCircle(1, 0, 2)\nDrawRectangle(0, 1, 1, 3, 3)\nFill()");
        assert!(report.succeeded(), "{:?}", report.error_log);
        assert_eq!(painted(&canvas, Color::White).len(), 100);
        assert_eq!((pen.x, pen.y), (5, 4));
    }

    #[test]
    fn test_circle_radius_zero() {
        let (report, canvas, pen) = run_walle("Spawn(4, 4)\nColor(\"green\")\nDrawCircle(0, 0, 0)");
        assert!(report.succeeded());
        assert_eq!(painted(&canvas, Color::Green), vec![(4, 4)]);
        assert_eq!((pen.x, pen.y), (4, 4));
    }

    #[test]
    fn test_circle_moves_pen_to_center() {
        let (report, canvas, pen) = run_walle("Spawn(1, 1)\nColor(\"black\")\nDrawCircle(1, 1, 3)");
        assert!(report.succeeded());
        assert_eq!((pen.x, pen.y), (4, 4));
        assert_eq!(canvas.get_pixel(4, 1), Color::Black);
        assert_eq!(canvas.get_pixel(4, 4), Color::White);
    }

    #[test]
    fn test_negative_radius() {
        let (report, _, _) = run_walle("Spawn(1, 1)\nDrawCircle(1, 1, -1)");
        assert!(report.error_log[0].contains("radius"));
    }

    #[test]
    fn test_rectangle() {
        let (report, canvas, pen) = run_walle("Spawn(2, 5)\nColor(\"purple\")\nDrawRectangle(1, 0, 3, 4, 2)");
        assert!(report.succeeded(), "{:?}", report.error_log);
        assert_eq!((pen.x, pen.y), (5, 5));
        let points = painted(&canvas, Color::Purple);
        assert_eq!(points.len(), 12);
        assert!(points.contains(&(3, 4)));
        assert!(points.contains(&(7, 6)));
        assert!(!points.contains(&(5, 5)));
    }

    #[test]
    fn test_rectangle_rejects_zero_sizes() {
        let (report, _, _) = run_walle("Spawn(2, 5)\nDrawRectangle(1, 0, 3, 0, 2)");
        assert_eq!(report.state, ExecutionState::HaltedError);
        let (report, _, _) = run_walle("Spawn(2, 5)\nDrawRectangle(1, 0, 0, 2, 2)");
        assert_eq!(report.state, ExecutionState::HaltedError);
    }

    #[test]
    fn test_huge_radius() {
        let (report, canvas, pen) = run_walle("Spawn(5, 5)\nColor(\"red\")\nDrawCircle(1, 0, 2000000000)");
        assert!(report.succeeded(), "{:?}", report.error_log);
        assert_eq!((pen.x, pen.y), (2_000_000_005, 5));
        assert_eq!(report.output_log[2], "Circle of radius 2000000000 around (2000000005, 5).");
        let expected: Vec<(i32, i32)> = (0..10).map(|y| (5, y)).collect();
        assert_eq!(painted(&canvas, Color::Red), expected);

        let (report, canvas, _) = run_walle("Spawn(5, 5)\nColor(\"red\")\nDrawCircle(0, 0, 2000000000)");
        assert!(report.succeeded(), "{:?}", report.error_log);
        assert!(painted(&canvas, Color::Red).is_empty());
    }

    #[test]
    fn test_huge_rectangle() {
        let (report, canvas, pen) = run_walle("Spawn(5, 5)\nColor(\"red\")\nDrawRectangle(1, 0, 1000000000, 2000000000, 4)");
        assert!(report.succeeded(), "{:?}", report.error_log);
        assert_eq!((pen.x, pen.y), (1_000_000_005, 5));
        let points = painted(&canvas, Color::Red);
        assert_eq!(points.len(), 13);
        assert!(points.contains(&(9, 3)));
        assert!(points.contains(&(5, 6)));
        assert!(!points.contains(&(6, 5)));

        let (report, canvas, _) = run_walle("Spawn(5, 5)\nColor(\"red\")\nDrawRectangle(1, 0, 2000000000, 2000000000, 2)");
        assert!(report.succeeded(), "{:?}", report.error_log);
        assert!(painted(&canvas, Color::Red).is_empty());
    }

    #[test]
    fn test_huge_brush() {
        let (report, canvas, _) = run_walle("Spawn(5, 5)\nColor(\"red\")\nSize(2000000001)\nDrawLine(1, 0, 1)");
        assert!(report.succeeded(), "{:?}", report.error_log);
        assert_eq!(painted(&canvas, Color::Red).len(), 100);

        let (report, canvas, _) = run_walle("Spawn(0, 0)\nColor(\"blue\")\nSize(2147483647)\nDrawCircle(1, 1, 3)");
        assert!(report.succeeded(), "{:?}", report.error_log);
        assert_eq!(painted(&canvas, Color::Blue).len(), 100);
    }

    #[test]
    fn test_fill_is_idempotent() {
        let mut canvas = PixelCanvas::new(6);
        for y in 0..6 {
            canvas.set_pixel(2, y, Color::Black);
        }
        let mut pen = PenState::new();
        let report = run_walle_on("Spawn(5, 5)\nColor(\"yellow\")\nFill()\nFill()", &mut canvas, &mut pen);
        assert!(report.succeeded(), "{:?}", report.error_log);
        assert_eq!(painted(&canvas, Color::Yellow).len(), 18);
        assert_eq!(painted(&canvas, Color::White).len(), 12);
        assert_eq!(report.output_log[2], "Fill at (5, 5) changed 18 pixel(s).");
        assert_eq!(report.output_log[3], "Fill at (5, 5) changed 0 pixel(s).");
    }

    #[test]
    fn test_canvas_persists_between_runs_but_pen_resets() {
        let mut canvas = PixelCanvas::new(5);
        let mut pen = PenState::new();
        run_walle_on("Spawn(1, 1)\nColor(\"red\")\nSize(3)\nDrawLine(0, 0, 0)", &mut canvas, &mut pen);
        assert_eq!(pen.brush_size, 3);

        let report = run_walle_on("Spawn(4, 4)\nv <- IsBrushColor(\"transparent\") + IsBrushSize(1)", &mut canvas, &mut pen);
        assert!(report.succeeded());
        assert_eq!(canvas.get_pixel(0, 0), Color::Red);
        assert_eq!(pen.brush_color, Color::Transparent);
        assert!(report.output_log.contains(&"v <- 2".to_string()));
    }

    #[test]
    fn test_goto_loop() {
        let code = "Spawn(0, 0)\nColor(\"red\")\ni <- 0\nloop\nDrawLine(1, 0, 1)\ni <- i + 1\nGoTo [loop] (i < 5)\n";
        let (report, canvas, pen) = run_walle(code);
        assert!(report.succeeded(), "{:?}", report.error_log);
        assert_eq!((pen.x, pen.y), (5, 0));
        assert_eq!(painted(&canvas, Color::Red).len(), 6);
    }

    #[test]
    fn test_unconditional_goto() {
        let code = "Spawn(0, 0)\nGoTo [skip]\nColor(\"red\")\nskip\nDrawLine(1, 0, 3)";
        let (report, canvas, _) = run_walle(code);
        assert!(report.succeeded());
        assert!(painted(&canvas, Color::Red).is_empty());
    }

    #[test]
    fn test_goto_unknown_label() {
        let (report, _, pen) = run_walle("Spawn(0, 0)\nGoTo [nowhere] (1 == 1)\nColor(\"red\")");
        assert_eq!(report.state, ExecutionState::HaltedError);
        assert_eq!(
            report.error_log,
            vec!["Runtime Error (Statement 2): Label 'nowhere' does not exist"]
        );
        assert_eq!(pen.brush_color, Color::Transparent);
    }

    #[test]
    fn test_goto_false_condition_with_unknown_label() {
        let (report, _, _) = run_walle("Spawn(0, 0)\nGoTo [nowhere] (0)");
        assert!(report.succeeded());
    }

    #[test]
    fn test_duplicate_labels_rejected_before_running() {
        let (report, _, pen) = run_walle("Spawn(0, 0)\nagain\nagain");
        assert_eq!(report.steps, 0);
        assert!(!pen.spawned);
        assert_eq!(
            report.error_log,
            vec!["Preprocessing Error: Duplicate label definition for 'again'"]
        );
    }

    #[test]
    fn test_division_by_zero_halts() {
        let (report, _, pen) = run_walle("Spawn(0, 0)\nx <- 3 + (4 / 0)\nColor(\"red\")");
        assert_eq!(report.state, ExecutionState::HaltedError);
        assert_eq!(report.error_log, vec!["Runtime Error (Statement 2): Division by zero"]);
        assert_eq!(pen.brush_color, Color::Transparent);

        let (report, _, _) = run_walle("Spawn(0, 0)\nGoTo [x] (1 % 0 == 1)\nx");
        assert_eq!(report.error_log, vec!["Runtime Error (Statement 2): Modulo by zero"]);
    }

    #[test]
    fn test_short_circuit_skips_division() {
        let (report, _, _) = run_walle("Spawn(0, 0)\na <- false && (1 / 0)\nb <- true || (1 / 0)");
        assert!(report.succeeded(), "{:?}", report.error_log);
        assert!(report.output_log.contains(&"a <- false".to_string()));
        assert!(report.output_log.contains(&"b <- true".to_string()));
    }

    #[test]
    fn test_undefined_variable() {
        let (report, _, _) = run_walle("Spawn(0, 0)\nx <- y + 1");
        assert_eq!(report.error_log, vec!["Runtime Error (Statement 2): Variable 'y' is not defined"]);
    }

    #[test]
    fn test_variables_ignore_case() {
        let (report, _, pen) = run_walle("Spawn(0, 0)\nStep <- 2\nDrawLine(1, 1, STEP * 2)");
        assert!(report.succeeded());
        assert_eq!((pen.x, pen.y), (4, 4));
    }

    #[test]
    fn test_color_requires_known_text() {
        let (report, _, _) = run_walle("Spawn(0, 0)\nColor(\"pink\")");
        assert_eq!(report.error_log, vec!["Runtime Error (Statement 2): Unknown color 'pink'"]);
        let (report, _, _) = run_walle("Spawn(0, 0)\nColor(3)");
        assert!(report.error_log[0].contains("Type mismatch"));
    }

    #[test]
    fn test_builtins_in_program() {
        let code = "Spawn(3, 4)\nColor(\"red\")\nDrawLine(0, 0, 0)\n\
                    n <- GetColorCount(\"red\", 0, 0, 9, 9)\n\
                    here <- IsCanvasColor(\"red\", 0, 0)\n\
                    right <- IsCanvasColor(\"red\", 0, 1)\n\
                    s <- GetCanvasSize() + GetActualX() * 10 + GetActualY()";
        let (report, _, _) = run_walle(code);
        assert!(report.succeeded(), "{:?}", report.error_log);
        for expected in ["n <- 1", "here <- 1", "right <- 0", "s <- 44"] {
            assert!(report.output_log.contains(&expected.to_string()), "missing {}", expected);
        }
    }

    #[test]
    fn test_get_color_count_single_pixel() {
        let (report, _, _) = run_walle("Spawn(0, 0)\nColor(\"red\")\nDrawLine(0, 0, 0)\nn <- GetColorCount(\"red\", 0, 0, 0, 0)");
        assert!(report.output_log.contains(&"n <- 1".to_string()));
        let (report, _, _) = run_walle("Spawn(0, 0)\nn <- GetColorCount(\"red\", 0, 0, 0, 0)");
        assert!(report.output_log.contains(&"n <- 0".to_string()));
    }

    #[test]
    fn test_keep_going_logs_every_error() {
        let program = parse("Spawn(0, 0)\nx <- 1 / 0\nColor(\"nope\")\nColor(\"red\")");
        let mut canvas = PixelCanvas::new(4);
        let mut pen = PenState::new();
        let interp = Interpreter::with_options(RunOptions {
            keep_going: true,
            ..RunOptions::default()
        });
        let report = interp.execute(&program, &mut canvas, &mut pen);
        assert_eq!(report.state, ExecutionState::HaltedError);
        assert_eq!(report.error_log.len(), 2);
        assert_eq!(pen.brush_color, Color::Red);
        assert_eq!(
            report.output_log.last().map(String::as_str),
            Some("Program execution finished with 2 error(s).")
        );
    }

    #[test]
    fn test_error_cutoff() {
        let program = parse("Spawn(0, 0)\nagain\nx <- 1 / 0\nGoTo [again]");
        let mut canvas = PixelCanvas::new(4);
        let mut pen = PenState::new();
        let interp = Interpreter::with_options(RunOptions {
            keep_going: true,
            ..RunOptions::default()
        });
        let report = interp.execute(&program, &mut canvas, &mut pen);
        assert_eq!(report.state, ExecutionState::HaltedError);
        assert_eq!(report.error_log.len(), MAX_RUNTIME_ERRORS + 2);
        assert_eq!(
            report.error_log.last().map(String::as_str),
            Some("Too many runtime errors. Halting execution.")
        );
    }

    #[test]
    fn test_step_limit() {
        let program = parse("Spawn(0, 0)\nspin\nGoTo [spin]");
        let mut canvas = PixelCanvas::new(4);
        let mut pen = PenState::new();
        let interp = Interpreter::with_options(RunOptions {
            max_steps: Some(50),
            ..RunOptions::default()
        });
        let report = interp.execute(&program, &mut canvas, &mut pen);
        assert_eq!(report.state, ExecutionState::HaltedError);
        assert_eq!(report.steps, 50);
        assert!(report.error_log[0].contains("50"));
    }

    #[test]
    fn test_step_mode_yields_before_each_statement() {
        let program = parse("Spawn(0, 0)\nColor(\"red\")\nDrawLine(1, 0, 2)");
        let mut canvas = PixelCanvas::new(4);
        let mut pen = PenState::new();
        let mut interp = Interpreter::new();
        interp.set_step_mode(true);

        let mut seen = Vec::new();
        let report = interp.execute_observed(&program, &mut canvas, &mut pen, |reason: YieldReason, view: &RunView<'_>| {
            seen.push((reason, view.pen.x));
            Flow::Continue
        });
        assert!(report.succeeded());
        assert_eq!(
            seen,
            vec![
                (YieldReason::Stepped(0), 0),
                (YieldReason::Stepped(1), 0),
                (YieldReason::Stepped(2), 0),
            ]
        );
    }

    #[test]
    fn test_breakpoint_then_stop() {
        let program = parse("Spawn(0, 0)\nColor(\"red\")\nDrawLine(1, 0, 2)");
        let mut canvas = PixelCanvas::new(4);
        let mut pen = PenState::new();
        let mut interp = Interpreter::new();
        interp.set_breakpoints(&[2]);

        let report = interp.execute_observed(&program, &mut canvas, &mut pen, |reason: YieldReason, view: &RunView<'_>| {
            assert_eq!(reason, YieldReason::Breakpoint(2));
            assert_eq!(view.pen.brush_color, Color::Red);
            Flow::Stop
        });
        assert_eq!(report.state, ExecutionState::Stopped);
        assert!(report.error_log.is_empty());
        assert_eq!(report.steps, 2);
        assert_eq!(canvas.get_pixel(1, 0), Color::White);
        assert_eq!(
            report.output_log.last().map(String::as_str),
            Some("Program execution stopped.")
        );
    }

    #[test]
    fn test_animation_yields_after_drawing() {
        let program = parse("Spawn(0, 0)\nColor(\"red\")\nDrawLine(1, 0, 1)\nSize(3)\nFill()");
        let mut canvas = PixelCanvas::new(4);
        let mut pen = PenState::new();
        let mut interp = Interpreter::new();
        interp.set_animate(true);

        let mut frames = Vec::new();
        let report = interp.execute_observed(&program, &mut canvas, &mut pen, |reason: YieldReason, view: &RunView<'_>| {
            frames.push((reason, view.canvas.get_pixel(1, 0)));
            Flow::Continue
        });
        assert!(report.succeeded());
        assert_eq!(
            frames,
            vec![
                (YieldReason::CanvasChanged(2), Color::Red),
                (YieldReason::CanvasChanged(4), Color::Red),
            ]
        );
    }
}
