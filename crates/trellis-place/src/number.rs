//! Numeric values of the description language.
//!
//! A [`Number`] is what appears on the right of `weight=`, `min=`, `gap=` and
//! friends. [`Margin`] and [`RepeatedArray`] are the two sequence forms.

use std::fmt;

use trellis_core::geometry::Rect;

/// Tagged numeric value.
///
/// A percent is stored already divided by 100, so `30%` holds `0.3`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Number {
    /// Unset.
    #[default]
    None,
    /// Whole pixels.
    Integer(i32),
    /// Fractional pixels.
    Real(f64),
    /// Fraction of a reference length.
    Percent(f64),
}

impl Number {
    pub fn percent(value: f64) -> Self {
        Number::Percent(value / 100.0)
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Number::None)
    }

    pub fn is_percent(&self) -> bool {
        matches!(self, Number::Percent(_))
    }

    /// Integer or real pixels.
    pub fn is_fixed(&self) -> bool {
        matches!(self, Number::Integer(_) | Number::Real(_))
    }

    pub fn is_negative(&self) -> bool {
        match *self {
            Number::None => false,
            Number::Integer(v) => v < 0,
            Number::Real(v) | Number::Percent(v) => v < 0.0,
        }
    }

    /// The raw value, without resolving percents.
    pub fn real(&self) -> f64 {
        match *self {
            Number::None => 0.0,
            Number::Integer(v) => v as f64,
            Number::Real(v) | Number::Percent(v) => v,
        }
    }

    /// Resolve to pixels. Percents resolve against `reference`.
    pub fn get_value(&self, reference: i32) -> f64 {
        match *self {
            Number::None => 0.0,
            Number::Integer(v) => v as f64,
            Number::Real(v) => v,
            Number::Percent(v) => reference as f64 * v,
        }
    }

    /// Resolve to pixels, `None` when unset.
    pub fn resolve(&self, reference: i32) -> Option<f64> {
        (!self.is_none()).then(|| self.get_value(reference))
    }

    pub fn clear(&mut self) {
        *self = Number::None;
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Number::Integer(value)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Real(value)
    }
}

/// Writes a real without float noise: `30.000000000000004` becomes `30`.
fn write_real(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    let rounded = (value * 10_000.0).round() / 10_000.0;
    if rounded == rounded.trunc() {
        write!(f, "{}", rounded as i64)
    } else {
        write!(f, "{}", rounded)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Number::None => Ok(()),
            Number::Integer(v) => write!(f, "{}", v),
            Number::Real(v) => write_real(f, v),
            Number::Percent(v) => {
                write_real(f, v * 100.0)?;
                write!(f, "%")
            }
        }
    }
}

/// Ordered numbers, optionally cycling.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepeatedArray {
    values: Vec<Number>,
    repeated: bool,
}

impl RepeatedArray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values(values: Vec<Number>, repeated: bool) -> Self {
        Self { values, repeated }
    }

    /// A single number applying to every index.
    pub fn uniform(value: Number) -> Self {
        Self {
            values: vec![value],
            repeated: true,
        }
    }

    pub fn push(&mut self, value: Number) {
        self.values.push(value);
    }

    pub fn set_repeated(&mut self, repeated: bool) {
        self.repeated = repeated;
    }

    pub fn is_repeated(&self) -> bool {
        self.repeated
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[Number] {
        &self.values
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.repeated = false;
    }

    /// Element `index`, cycling when repeated, [`Number::None`] past the end.
    pub fn at(&self, index: usize) -> Number {
        if self.values.is_empty() {
            return Number::None;
        }
        if self.repeated {
            return self.values[index % self.values.len()];
        }
        self.values.get(index).copied().unwrap_or_default()
    }
}

impl fmt::Display for RepeatedArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.repeated && self.values.len() == 1 {
            return write!(f, "{}", self.values[0]);
        }
        write!(f, "[")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", value)?;
        }
        if self.repeated {
            write!(f, ",repeated")?;
        }
        write!(f, "]")
    }
}

/// Resolved edge widths in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Up to four edge numbers, CSS-style.
///
/// | count | meaning                                  |
/// |-------|------------------------------------------|
/// | 1     | all edges                                |
/// | 2     | top/bottom, left/right                   |
/// | 3     | top, left/right, bottom                  |
/// | 4     | top, right, bottom, left                 |
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Margin {
    numbers: Vec<Number>,
}

impl Margin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps at most the first four numbers.
    pub fn from_numbers(mut numbers: Vec<Number>) -> Self {
        numbers.truncate(4);
        Self { numbers }
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    pub fn numbers(&self) -> &[Number] {
        &self.numbers
    }

    pub fn clear(&mut self) {
        self.numbers.clear();
    }

    /// Edge numbers as `[top, right, bottom, left]`.
    pub fn edges(&self) -> [Number; 4] {
        match *self.numbers.as_slice() {
            [] => [Number::None; 4],
            [all] => [all; 4],
            [vertical, horizontal] => [vertical, horizontal, vertical, horizontal],
            [top, horizontal, bottom] => [top, horizontal, bottom, horizontal],
            [top, right, bottom, left, ..] => [top, right, bottom, left],
        }
    }

    /// Resolve the edges against `rect`: left/right percents use its width,
    /// top/bottom percents its height.
    pub fn resolve(&self, rect: Rect<i32>) -> Edges {
        let [top, right, bottom, left] = self.edges();
        Edges {
            top: top.get_value(rect.height),
            right: right.get_value(rect.width),
            bottom: bottom.get_value(rect.height),
            left: left.get_value(rect.width),
        }
    }

    /// `rect` shrunk by the resolved edges.
    pub fn area(&self, rect: Rect<i32>) -> Rect<i32> {
        if self.numbers.is_empty() {
            return rect;
        }
        let edges = self.resolve(rect);
        rect.inset(
            edges.top.round() as i32,
            edges.right.round() as i32,
            edges.bottom.round() as i32,
            edges.left.round() as i32,
        )
    }

    /// Grow a margin-exclusive extent back to the full extent: fixed edges
    /// are added, then each percent edge divides by `1 - p`.
    pub fn expand(&self, width: f64, height: f64) -> (f64, f64) {
        let [top, right, bottom, left] = self.edges();
        let grow = |extent: f64, edges: [Number; 2]| {
            let mut extent = extent;
            for edge in edges {
                if edge.is_fixed() {
                    extent += edge.real().max(0.0);
                }
            }
            for edge in edges {
                if let Number::Percent(p) = edge
                    && p > 0.0
                    && p < 1.0
                {
                    extent /= 1.0 - p;
                }
            }
            extent
        };
        (grow(width, [left, right]), grow(height, [top, bottom]))
    }
}

impl fmt::Display for Margin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let [single] = self.numbers.as_slice() {
            return write!(f, "{}", single);
        }
        write!(f, "[")?;
        for (i, number) in self.numbers.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", number)?;
        }
        write!(f, "]")
    }
}
