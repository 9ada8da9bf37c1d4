//! Pixel canvas, pen state and raster primitives
//!
//! The canvas is a square grid of palette colors. All primitives clip to
//! the canvas: out-of-bounds writes are dropped and out-of-bounds reads
//! return transparent.

use crate::lang::value::Color;

/// A square pixel surface the interpreter draws on
pub trait Canvas {
    /// Side length in pixels
    fn size(&self) -> i32;

    /// Color at (x, y), transparent when outside the canvas
    fn get_pixel(&self, x: i32, y: i32) -> Color;

    /// Set (x, y). Returns false, changing nothing, when outside the canvas.
    fn set_pixel(&mut self, x: i32, y: i32, color: Color) -> bool;

    /// Called after a statement changed pixels
    fn notify_changed(&mut self) {}

    fn contains(&self, x: i32, y: i32) -> bool {
        let size = self.size();
        x >= 0 && y >= 0 && x < size && y < size
    }
}

/// In-memory canvas, row-major
#[derive(Clone, Debug, PartialEq)]
pub struct PixelCanvas {
    size: usize,
    pixels: Vec<Color>,
    /// Bumped by every `notify_changed`
    generation: u64,
}

impl PixelCanvas {
    /// A white canvas; sizes below 1 become 1
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            size,
            pixels: vec![Color::White; size * size],
            generation: 0,
        }
    }

    /// Change the side length. The canvas is cleared to white.
    pub fn resize(&mut self, size: usize) {
        let size = size.max(1);
        self.size = size;
        self.pixels = vec![Color::White; size * size];
        self.generation += 1;
    }

    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
        self.generation += 1;
    }

    pub fn side(&self) -> usize {
        self.size
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// RGBA8 bytes, row-major
    pub fn rgba(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| c.rgba()).collect()
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x < self.size && y < self.size {
            Some(y * self.size + x)
        } else {
            None
        }
    }
}

impl Default for PixelCanvas {
    fn default() -> Self {
        Self::new(32)
    }
}

impl Canvas for PixelCanvas {
    fn size(&self) -> i32 {
        i32::try_from(self.size).unwrap_or(i32::MAX)
    }

    fn get_pixel(&self, x: i32, y: i32) -> Color {
        match self.index(x, y) {
            Some(idx) => self.pixels[idx],
            None => Color::Transparent,
        }
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.pixels[idx] = color;
                true
            }
            None => false,
        }
    }

    fn notify_changed(&mut self) {
        self.generation += 1;
    }
}

/// The pen ("Wall-E")
#[derive(Clone, Debug, PartialEq)]
pub struct PenState {
    pub x: i32,
    pub y: i32,
    pub brush_color: Color,
    /// Always odd and at least 1
    pub brush_size: i32,
    pub spawned: bool,
}

impl Default for PenState {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            brush_color: Color::Transparent,
            brush_size: 1,
            spawned: false,
        }
    }
}

impl PenState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to defaults, as at the start of every run
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Canvas bounds as seen by a brush of a given size. Coordinates are i64 so
/// centers plus brush and shape extents cannot overflow.
#[derive(Clone, Copy, Debug)]
struct Reach {
    last: i64,
    half: i64,
}

/// Clipped (columns, rows), both inclusive
type Area = ((i64, i64), (i64, i64));

impl Reach {
    fn new(canvas: &dyn Canvas, brush_size: i32) -> Self {
        Self {
            last: i64::from(canvas.size()) - 1,
            half: i64::from(brush_size.max(1) / 2),
        }
    }

    /// Canvas columns (or rows) touched by brushes centered from `from` to `to`
    fn cover(&self, from: i64, to: i64) -> Option<(i64, i64)> {
        if from > to {
            return None;
        }
        let lo = (from - self.half).max(0);
        let hi = (to + self.half).min(self.last);
        (lo <= hi).then_some((lo, hi))
    }

    fn area(&self, x: i64, y: i64) -> Option<Area> {
        Some((self.cover(x, x)?, self.cover(y, y)?))
    }

    fn covers_all(&self, area: Area) -> bool {
        area == ((0, self.last), (0, self.last))
    }

    /// The range of centers around `center` that all clip to the same span,
    /// or None when the span moves with every step
    fn steady(&self, center: i64) -> Option<(i64, i64)> {
        if center < -self.half {
            Some((i64::MIN, -self.half - 1))
        } else if center > self.last + self.half {
            Some((self.last + self.half + 1, i64::MAX))
        } else if center - self.half <= 0 && center + self.half >= self.last {
            Some((self.last - self.half, self.half))
        } else {
            None
        }
    }

    /// First step after `step` at which `base + dir * step` may clip
    /// differently
    fn next_linear(&self, base: i64, dir: i64, step: i64) -> i64 {
        if dir == 0 {
            return i64::MAX;
        }
        match self.steady(base + dir * step) {
            None => step + 1,
            Some((_, hi)) if dir > 0 => {
                if hi == i64::MAX {
                    i64::MAX
                } else {
                    hi - base + 1
                }
            }
            Some((lo, _)) => {
                if lo == i64::MIN {
                    i64::MAX
                } else {
                    base - lo + 1
                }
            }
        }
    }
}

fn fill_area(canvas: &mut dyn Canvas, ((x0, x1), (y0, y1)): Area, color: Color) {
    // spans are clipped to the canvas, so the casts are lossless
    for y in y0..=y1 {
        for x in x0..=x1 {
            canvas.set_pixel(x as i32, y as i32, color);
        }
    }
}

/// Stamp a square brush of side `brush_size` centered on (cx, cy)
pub fn stamp(canvas: &mut dyn Canvas, cx: i32, cy: i32, brush_size: i32, color: Color) {
    let reach = Reach::new(canvas, brush_size);
    if let Some(area) = reach.area(i64::from(cx), i64::from(cy)) {
        fill_area(canvas, area, color);
    }
}

/// Stamp `steps + 1` brushes from (x, y) along (dx, dy). Runs of centers
/// that clip to the same square are painted once.
pub fn line(
    canvas: &mut dyn Canvas,
    (x, y): (i32, i32),
    (dx, dy): (i32, i32),
    steps: i32,
    brush_size: i32,
    color: Color,
) {
    let reach = Reach::new(canvas, brush_size);
    let (x, y) = (i64::from(x), i64::from(y));
    let (dx, dy) = (i64::from(dx.signum()), i64::from(dy.signum()));
    let steps = i64::from(steps);

    let mut painted = None;
    let mut step = 0;
    while step <= steps {
        if let Some(area) = reach.area(x + dx * step, y + dy * step) {
            if painted != Some(area) {
                fill_area(canvas, area, color);
                if reach.covers_all(area) {
                    return;
                }
                painted = Some(area);
            }
        }
        step = reach
            .next_linear(x, dx, step)
            .min(reach.next_linear(y, dy, step))
            .max(step + 1);
    }
}

/// One octant of the midpoint circle. At step `x` the outline point lies
/// `depth(x)` away from the center on the other axis; this is the closed
/// form of the usual incremental decision variable, so steps can be skipped.
struct Arc {
    radius: i64,
    last_step: i64,
}

impl Arc {
    fn new(radius: i64) -> Self {
        let mut arc = Self { radius, last_step: 0 };
        // the octant runs while x <= depth(x - 1)
        let (mut lo, mut hi) = (0, radius + 1);
        while hi - lo > 1 {
            let mid = lo + (hi - lo) / 2;
            if mid <= arc.depth(mid - 1) {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        arc.last_step = lo;
        arc
    }

    /// Largest m <= radius with m² - m <= radius² - x²
    fn outer(&self, x: i64) -> i64 {
        if x < 0 {
            return self.radius + 1;
        }
        let r = i128::from(self.radius);
        let t = r * r - i128::from(x) * i128::from(x);
        if t < 0 {
            return 0;
        }
        let mut m = ((1.0 + (1.0 + 4.0 * t as f64).sqrt()) / 2.0) as i128;
        while m > 0 && m * m - m > t {
            m -= 1;
        }
        while (m + 1) * (m + 1) - (m + 1) <= t {
            m += 1;
        }
        m.min(r) as i64
    }

    /// Distance of the outline from the center on the other axis at step `x`.
    /// Never increases with `x`.
    fn depth(&self, x: i64) -> i64 {
        if x < 0 {
            return self.radius;
        }
        self.outer(x).max(self.outer(x - 1) - 1)
    }

    /// First step after `x` whose depth is below `bound`, or one past the
    /// last step
    fn first_below(&self, x: i64, bound: i64) -> i64 {
        let (mut lo, mut hi) = (x, self.last_step + 1);
        while hi - lo > 1 {
            let mid = lo + (hi - lo) / 2;
            if self.depth(mid) < bound {
                hi = mid;
            } else {
                lo = mid;
            }
        }
        hi
    }
}

/// (step sign, depth sign, axes swapped) of the eight symmetric octants
const OCTANTS: [(i64, i64, bool); 8] = [
    (1, -1, false),
    (-1, -1, false),
    (1, 1, false),
    (-1, 1, false),
    (1, -1, true),
    (1, 1, true),
    (-1, -1, true),
    (-1, 1, true),
];

/// Midpoint circle outline around (cx, cy), each point stamped with the
/// brush. Stretches of the outline that stay off the canvas, or clip to the
/// same square, are skipped.
pub fn circle(canvas: &mut dyn Canvas, cx: i32, cy: i32, radius: i32, brush_size: i32, color: Color) {
    if radius < 0 {
        return;
    }
    let reach = Reach::new(canvas, brush_size);
    let arc = Arc::new(i64::from(radius));
    let (cx, cy) = (i64::from(cx), i64::from(cy));

    for (along, across, swapped) in OCTANTS {
        let (base_step, base_depth) = if swapped { (cy, cx) } else { (cx, cy) };
        let mut painted = None;
        let mut x = 0;

        while x <= arc.last_step {
            let depth = arc.depth(x);
            let on_step = base_step + along * x;
            let on_depth = base_depth + across * depth;
            let (px, py) = if swapped {
                (on_depth, on_step)
            } else {
                (on_step, on_depth)
            };

            if let Some(area) = reach.area(px, py) {
                if painted != Some(area) {
                    fill_area(canvas, area, color);
                    if reach.covers_all(area) {
                        return;
                    }
                    painted = Some(area);
                }
            }

            let next_depth = match reach.steady(on_depth) {
                None => arc.first_below(x, depth),
                Some((lo, _)) if across > 0 => {
                    if lo == i64::MIN {
                        i64::MAX
                    } else {
                        arc.first_below(x, lo - base_depth)
                    }
                }
                Some((_, hi)) => {
                    if hi == i64::MAX {
                        i64::MAX
                    } else {
                        arc.first_below(x, base_depth - hi)
                    }
                }
            };
            x = reach
                .next_linear(base_step, along, x)
                .min(next_depth)
                .max(x + 1);
        }
    }
}

/// Border of the rectangle centered on (cx, cy); half extents use integer
/// division. Brush squares along an edge merge into one clipped block.
pub fn rectangle_outline(
    canvas: &mut dyn Canvas,
    cx: i32,
    cy: i32,
    width: i32,
    height: i32,
    brush_size: i32,
    color: Color,
) {
    let reach = Reach::new(canvas, brush_size);
    let (cx, cy) = (i64::from(cx), i64::from(cy));
    let (start_x, end_x) = (cx - i64::from(width / 2), cx + i64::from(width / 2));
    let (start_y, end_y) = (cy - i64::from(height / 2), cy + i64::from(height / 2));

    // horizontal edges own the corners
    let edges = [
        (reach.cover(start_x, end_x), reach.cover(start_y, start_y)),
        (reach.cover(start_x, end_x), reach.cover(end_y, end_y)),
        (reach.cover(start_x, start_x), reach.cover(start_y + 1, end_y - 1)),
        (reach.cover(end_x, end_x), reach.cover(start_y + 1, end_y - 1)),
    ];
    for edge in edges {
        if let (Some(columns), Some(rows)) = edge {
            fill_area(canvas, (columns, rows), color);
        }
    }
}

/// 4-connected flood fill from (x, y), replacing the seed's color with
/// `fill`. Returns how many pixels changed.
pub fn flood_fill(canvas: &mut dyn Canvas, x: i32, y: i32, fill: Color) -> usize {
    if !canvas.contains(x, y) {
        return 0;
    }

    let target = canvas.get_pixel(x, y);
    if target == fill {
        return 0;
    }

    let mut changed = 0;
    let mut stack = vec![(x, y)];

    while let Some((x, y)) = stack.pop() {
        if !canvas.contains(x, y) || canvas.get_pixel(x, y) != target {
            continue;
        }
        canvas.set_pixel(x, y, fill);
        changed += 1;

        stack.push((x + 1, y));
        stack.push((x - 1, y));
        stack.push((x, y + 1));
        stack.push((x, y - 1));
    }

    changed
}

/// Pixels of `color` inside the rectangle spanned by two corners, in any order
pub fn count_color(canvas: &dyn Canvas, color: Color, (x1, y1): (i32, i32), (x2, y2): (i32, i32)) -> usize {
    let last = canvas.size() - 1;
    let (min_x, max_x) = (x1.min(x2).max(0), x1.max(x2).min(last));
    let (min_y, max_y) = (y1.min(y2).max(0), y1.max(y2).min(last));

    let mut count = 0;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            if canvas.get_pixel(x, y) == color {
                count += 1;
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colored(canvas: &PixelCanvas, color: Color) -> Vec<(i32, i32)> {
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
    fn test_new_canvas_is_white() {
        let canvas = PixelCanvas::new(4);
        assert_eq!(canvas.size(), 4);
        assert_eq!(colored(&canvas, Color::White).len(), 16);
        assert_eq!(PixelCanvas::new(0).size(), 1);
    }

    #[test]
    fn test_bounds_are_checked() {
        let mut canvas = PixelCanvas::new(3);
        assert!(!canvas.set_pixel(3, 0, Color::Red));
        assert!(!canvas.set_pixel(-1, 1, Color::Red));
        assert_eq!(canvas.get_pixel(0, 3), Color::Transparent);
        assert!(canvas.set_pixel(2, 2, Color::Red));
        assert_eq!(canvas.get_pixel(2, 2), Color::Red);
    }

    #[test]
    fn test_resize_and_clear() {
        let mut canvas = PixelCanvas::new(3);
        canvas.set_pixel(1, 1, Color::Blue);
        canvas.resize(5);
        assert_eq!(canvas.size(), 5);
        assert!(colored(&canvas, Color::Blue).is_empty());
        canvas.clear(Color::Black);
        assert_eq!(colored(&canvas, Color::Black).len(), 25);
    }

    #[test]
    fn test_rgba_export() {
        let mut canvas = PixelCanvas::new(2);
        canvas.set_pixel(1, 0, Color::Red);
        let bytes = canvas.rgba();
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[0..4], &[255, 255, 255, 255]);
        assert_eq!(&bytes[4..8], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_stamp_is_clipped() {
        let mut canvas = PixelCanvas::new(4);
        stamp(&mut canvas, 0, 0, 3, Color::Red);
        assert_eq!(colored(&canvas, Color::Red), vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn test_line_stamps_every_step() {
        let mut canvas = PixelCanvas::new(8);
        line(&mut canvas, (1, 1), (1, 1), 3, 1, Color::Green);
        assert_eq!(
            colored(&canvas, Color::Green),
            vec![(1, 1), (2, 2), (3, 3), (4, 4)]
        );
    }

    #[test]
    fn test_circle_radius_zero_is_one_pixel() {
        let mut canvas = PixelCanvas::new(5);
        circle(&mut canvas, 2, 2, 0, 1, Color::Blue);
        assert_eq!(colored(&canvas, Color::Blue), vec![(2, 2)]);
    }

    #[test]
    fn test_circle_radius_two() {
        let mut canvas = PixelCanvas::new(5);
        circle(&mut canvas, 2, 2, 2, 1, Color::Blue);
        let points = colored(&canvas, Color::Blue);
        assert_eq!(points.len(), 12);
        assert!(points.contains(&(2, 0)));
        assert!(points.contains(&(0, 2)));
        assert!(points.contains(&(4, 3)));
        assert!(!points.contains(&(2, 2)));
        assert!(!points.contains(&(0, 0)));
    }

    /// Stamp every outline point of the incremental midpoint loop
    fn reference_circle(canvas: &mut PixelCanvas, cx: i32, cy: i32, radius: i32, brush_size: i32, color: Color) {
        let (mut x, mut y, mut p) = (0, -radius, -radius);
        while x <= -y {
            if p > 0 {
                y += 1;
                p += 2 * (x + y) + 1;
            } else {
                p += 2 * x + 1;
            }
            for (px, py) in [(x, y), (-x, y), (x, -y), (-x, -y), (y, x), (-y, x), (y, -x), (-y, -x)] {
                stamp(canvas, cx + px, cy + py, brush_size, color);
            }
            x += 1;
        }
    }

    #[test]
    fn test_circle_matches_incremental_loop() {
        for radius in [1, 3, 4, 6, 7, 11, 17] {
            for brush_size in [1, 3, 5] {
                for (cx, cy) in [(4, 4), (0, 8), (-3, 2), (12, -5), (20, 20)] {
                    let mut expected = PixelCanvas::new(9);
                    reference_circle(&mut expected, cx, cy, radius, brush_size, Color::Purple);
                    let mut actual = PixelCanvas::new(9);
                    circle(&mut actual, cx, cy, radius, brush_size, Color::Purple);
                    assert_eq!(
                        colored(&actual, Color::Purple),
                        colored(&expected, Color::Purple),
                        "radius {} brush {} center ({}, {})",
                        radius,
                        brush_size,
                        cx,
                        cy
                    );
                }
            }
        }
    }

    #[test]
    fn test_huge_circle_only_touches_the_canvas_edge() {
        let mut canvas = PixelCanvas::new(10);
        circle(&mut canvas, 2_000_000_005, 5, 2_000_000_000, 1, Color::Red);
        let expected: Vec<_> = (0..10).map(|y| (5, y)).collect();
        assert_eq!(colored(&canvas, Color::Red), expected);

        let mut canvas = PixelCanvas::new(10);
        circle(&mut canvas, 5, 5, i32::MAX, 1, Color::Red);
        assert!(colored(&canvas, Color::Red).is_empty());
    }

    #[test]
    fn test_huge_brush_is_clipped() {
        let mut canvas = PixelCanvas::new(6);
        stamp(&mut canvas, 1_000_000_000, 2, i32::MAX, Color::Blue);
        assert_eq!(colored(&canvas, Color::Blue).len(), 36);

        let mut canvas = PixelCanvas::new(6);
        stamp(&mut canvas, i32::MAX, 2, i32::MAX, Color::Blue);
        assert!(colored(&canvas, Color::Blue).is_empty());

        let mut canvas = PixelCanvas::new(6);
        stamp(&mut canvas, i32::MIN, 2, 3, Color::Blue);
        assert!(colored(&canvas, Color::Blue).is_empty());

        let mut canvas = PixelCanvas::new(6);
        line(&mut canvas, (0, 0), (1, 1), 5, 2_000_000_001, Color::Blue);
        assert_eq!(colored(&canvas, Color::Blue).len(), 36);
    }

    #[test]
    fn test_long_line_leaving_the_canvas() {
        let mut canvas = PixelCanvas::new(6);
        line(&mut canvas, (2, 3), (1, 0), i32::MAX, 1, Color::Green);
        assert_eq!(colored(&canvas, Color::Green), vec![(2, 3), (3, 3), (4, 3), (5, 3)]);

        let mut canvas = PixelCanvas::new(6);
        line(&mut canvas, (4, 4), (-1, -1), i32::MAX, 3, Color::Green);
        // diagonal band three pixels wide
        let points = colored(&canvas, Color::Green);
        assert!(points.contains(&(0, 0)));
        assert!(points.contains(&(5, 5)));
        assert!(points.contains(&(1, 0)));
        assert!(!points.contains(&(3, 0)));
    }

    #[test]
    fn test_huge_rectangle_is_clipped() {
        let mut canvas = PixelCanvas::new(10);
        rectangle_outline(&mut canvas, 1_000_000_005, 5, 2_000_000_000, 4, 1, Color::Black);
        let points = colored(&canvas, Color::Black);
        // left edge at x = 5, top and bottom rows 3 and 7 run off to the right
        assert_eq!(points.len(), 5 + 5 + 3);
        assert!(points.contains(&(5, 4)));
        assert!(points.contains(&(9, 3)));
        assert!(!points.contains(&(6, 5)));

        let mut canvas = PixelCanvas::new(10);
        rectangle_outline(&mut canvas, i32::MAX, i32::MAX, i32::MAX, i32::MAX, 1, Color::Black);
        assert!(colored(&canvas, Color::Black).is_empty());

        let mut canvas = PixelCanvas::new(10);
        rectangle_outline(&mut canvas, 1_000_000_000, 1_000_000_000, i32::MAX, i32::MAX, i32::MAX, Color::Black);
        assert_eq!(colored(&canvas, Color::Black).len(), 100);
    }

    #[test]
    fn test_rectangle_outline() {
        let mut canvas = PixelCanvas::new(7);
        rectangle_outline(&mut canvas, 3, 3, 4, 2, 1, Color::Black);
        let points = colored(&canvas, Color::Black);
        // x in 1..=5, y in 2..=4, border only
        assert_eq!(points.len(), 5 + 5 + 1 + 1);
        assert!(points.contains(&(1, 3)));
        assert!(points.contains(&(5, 3)));
        assert!(!points.contains(&(3, 3)));
    }

    #[test]
    fn test_flood_fill_region() {
        let mut canvas = PixelCanvas::new(5);
        for i in 0..5 {
            canvas.set_pixel(2, i, Color::Black);
        }
        let changed = flood_fill(&mut canvas, 0, 0, Color::Red);
        assert_eq!(changed, 10);
        assert_eq!(canvas.get_pixel(3, 0), Color::White);
        assert_eq!(flood_fill(&mut canvas, 0, 0, Color::Red), 0);
        assert_eq!(flood_fill(&mut canvas, 9, 9, Color::Red), 0);
    }

    #[test]
    fn test_flood_fill_does_not_leak_diagonally() {
        let mut canvas = PixelCanvas::new(3);
        canvas.set_pixel(1, 0, Color::Black);
        canvas.set_pixel(0, 1, Color::Black);
        assert_eq!(flood_fill(&mut canvas, 0, 0, Color::Red), 1);
    }

    #[test]
    fn test_flood_fill_large_canvas() {
        let mut canvas = PixelCanvas::new(512);
        assert_eq!(flood_fill(&mut canvas, 100, 100, Color::Yellow), 512 * 512);
    }

    #[test]
    fn test_count_color_any_corner_order() {
        let mut canvas = PixelCanvas::new(4);
        canvas.set_pixel(0, 0, Color::Red);
        canvas.set_pixel(3, 3, Color::Red);
        assert_eq!(count_color(&canvas, Color::Red, (0, 0), (0, 0)), 1);
        assert_eq!(count_color(&canvas, Color::Red, (3, 3), (0, 0)), 2);
        assert_eq!(count_color(&canvas, Color::Red, (0, 3), (3, 0)), 2);
        assert_eq!(count_color(&canvas, Color::White, (0, 0), (1, 1)), 3);
    }

    #[test]
    fn test_pen_reset() {
        let mut pen = PenState {
            x: 3,
            y: 4,
            brush_color: Color::Red,
            brush_size: 5,
            spawned: true,
        };
        pen.reset();
        assert_eq!(pen, PenState::default());
        assert_eq!(pen.brush_color, Color::Transparent);
    }
}
