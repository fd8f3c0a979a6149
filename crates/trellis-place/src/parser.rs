//! Recursive-descent parser from description text to a [`DivisionTree`].

use tracing::debug;
use trellis_core::alloc::HashMap;
use trellis_core::geometry::Axis;
use trellis_core::profiling::profile_function;

use crate::division::{Collapse, Division, DivisionId, DivisionKind, DockSide, Fit};
use crate::error::{ParseError, ParseErrorKind};
use crate::number::{Margin, Number, RepeatedArray};
use crate::tokenizer::{Keyword, Token, TokenKind, tokenize};
use crate::tree::DivisionTree;

/// Parse a description into a fresh tree.
///
/// The top level may omit the outer `<>`. Division names must be unique
/// within the text.
pub fn parse(source: &str) -> Result<DivisionTree, ParseError> {
    profile_function!();
    let tokens = tokenize(source)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        end: source.len(),
        tree: DivisionTree::new(),
        names: HashMap::new(),
    };
    let root = parser.scan_div(0, true)?;
    parser.tree.set_root(root);
    debug!(divisions = parser.tree.len(), "parsed description");
    Ok(parser.tree)
}

enum Item {
    Child { id: DivisionId, offset: usize },
    Splitter(Number),
}

/// Attributes collected while scanning one division.
struct Pending {
    division: Division,
    name_offset: usize,
    type_keyword: Option<Keyword>,
    vertical: bool,
    grid: (u32, u32),
    collapses: Vec<Collapse>,
    undisplayed: bool,
    invisible: bool,
    items: Vec<Item>,
}

impl Pending {
    fn new(offset: usize) -> Self {
        Self {
            division: Division::new(DivisionKind::Arrange(Axis::Horizontal)),
            name_offset: offset,
            type_keyword: None,
            vertical: false,
            grid: (1, 1),
            collapses: Vec::new(),
            undisplayed: false,
            invisible: false,
            items: Vec::new(),
        }
    }

    fn set_type(&mut self, keyword: Keyword, offset: usize) -> Result<(), ParseError> {
        match self.type_keyword {
            Some(existing) if existing != keyword => Err(ParseError::new(
                ParseErrorKind::InvalidKindCombination,
                offset,
            )),
            _ => {
                self.type_keyword = Some(keyword);
                Ok(())
            }
        }
    }

    fn kind(&mut self) -> DivisionKind {
        match self.type_keyword {
            Some(Keyword::Grid) => {
                let (columns, rows) = self.grid;
                DivisionKind::Grid {
                    columns,
                    rows,
                    collapses: normalize_collapses(
                        columns,
                        rows,
                        std::mem::take(&mut self.collapses),
                    ),
                }
            }
            Some(Keyword::Dock) => DivisionKind::Dock,
            Some(Keyword::Switchable) => DivisionKind::Switchable,
            _ if self.vertical => DivisionKind::Arrange(Axis::Vertical),
            _ => DivisionKind::Arrange(Axis::Horizontal),
        }
    }
}

/// Drop collapses that start outside the grid, clamp those that run past an
/// edge, and clip overlaps against earlier collapses.
pub fn normalize_collapses(columns: u32, rows: u32, raw: Vec<Collapse>) -> Vec<Collapse> {
    let mut out: Vec<Collapse> = Vec::new();
    for mut collapse in raw {
        if collapse.x >= columns || collapse.y >= rows || collapse.width == 0 || collapse.height == 0
        {
            continue;
        }
        collapse.width = collapse.width.min(columns - collapse.x);
        collapse.height = collapse.height.min(rows - collapse.y);

        let covered = |x: u32, y: u32| out.iter().any(|c| c.contains(x, y));
        if covered(collapse.x, collapse.y) {
            continue;
        }
        let mut width = 1;
        while width < collapse.width && !covered(collapse.x + width, collapse.y) {
            width += 1;
        }
        let mut height = 1;
        while height < collapse.height
            && (collapse.x..collapse.x + width).all(|x| !covered(x, collapse.y + height))
        {
            height += 1;
        }
        collapse.width = width;
        collapse.height = height;
        out.push(collapse);
    }
    out
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    end: usize,
    tree: DivisionTree,
    names: HashMap<String, usize>,
}

impl Parser {
    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn offset(&self) -> usize {
        self.tokens.get(self.pos).map_or(self.end, |t| t.span.start)
    }

    fn expect_equal(&mut self, keyword: Keyword) -> Result<(), ParseError> {
        match self.next() {
            Some(Token {
                kind: TokenKind::Equal,
                ..
            }) => Ok(()),
            Some(token) => Err(ParseError::new(
                ParseErrorKind::MissingValue(keyword.as_str()),
                token.span.start,
            )),
            None => Err(ParseError::new(
                ParseErrorKind::MissingValue(keyword.as_str()),
                self.end,
            )),
        }
    }

    fn expect_number(&mut self, keyword: Keyword) -> Result<Number, ParseError> {
        self.expect_equal(keyword)?;
        let offset = self.offset();
        match self.next().map(|t| t.kind) {
            Some(TokenKind::Number(number)) => Ok(number),
            _ => Err(ParseError::new(
                ParseErrorKind::MissingValue(keyword.as_str()),
                offset,
            )),
        }
    }

    /// `= number` or `= array`, as a repeated array.
    fn expect_array(&mut self, keyword: Keyword) -> Result<RepeatedArray, ParseError> {
        self.expect_equal(keyword)?;
        let offset = self.offset();
        match self.next().map(|t| t.kind) {
            Some(TokenKind::Number(number)) => Ok(RepeatedArray::uniform(number)),
            Some(TokenKind::Array(array)) => Ok(array),
            _ => Err(ParseError::new(
                ParseErrorKind::MissingValue(keyword.as_str()),
                offset,
            )),
        }
    }

    fn grid_extent(number: Number, offset: usize) -> Result<u32, ParseError> {
        match number {
            Number::Integer(n) => Ok(n.max(1) as u32),
            Number::Real(n) => Ok(n.max(1.0) as u32),
            _ => Err(ParseError::new(ParseErrorKind::InvalidNumber, offset)),
        }
    }

    fn keyword(
        &mut self,
        pending: &mut Pending,
        keyword: Keyword,
        offset: usize,
    ) -> Result<(), ParseError> {
        let division = &mut pending.division;
        match keyword {
            Keyword::Weight => {
                division.weight = self.expect_number(keyword)?;
                division.weight_axis = None;
            }
            Keyword::Width => {
                division.weight = self.expect_number(keyword)?;
                division.weight_axis = Some(Axis::Horizontal);
            }
            Keyword::Height => {
                division.weight = self.expect_number(keyword)?;
                division.weight_axis = Some(Axis::Vertical);
            }
            Keyword::Min => division.min_px = self.expect_number(keyword)?,
            Keyword::Max => division.max_px = self.expect_number(keyword)?,
            Keyword::Arrange => division.arrange = self.expect_array(keyword)?,
            Keyword::Gap => division.gap = self.expect_array(keyword)?,
            Keyword::HFit | Keyword::VFit => {
                division.fit |= if keyword == Keyword::HFit {
                    Fit::HORIZONTAL
                } else {
                    Fit::VERTICAL
                };
                if self.peek() == Some(&TokenKind::Equal) {
                    division.fit_parameters = self.expect_array(keyword)?;
                }
            }
            Keyword::Fit => division.fit = Fit::BOTH,
            Keyword::Margin => {
                let array = self.expect_array(keyword)?;
                division.margin = Margin::from_numbers(array.values().to_vec());
            }
            Keyword::Grid => {
                pending.set_type(keyword, offset)?;
                if self.peek() == Some(&TokenKind::Equal) {
                    self.next();
                    let value_offset = self.offset();
                    pending.grid = match self.next().map(|t| t.kind) {
                        Some(TokenKind::Number(n)) => {
                            let edge = Self::grid_extent(n, value_offset)?;
                            (edge, edge)
                        }
                        Some(TokenKind::Array(array)) => match *array.values() {
                            [n] => {
                                let edge = Self::grid_extent(n, value_offset)?;
                                (edge, edge)
                            }
                            [columns, rows, ..] => (
                                Self::grid_extent(columns, value_offset)?,
                                Self::grid_extent(rows, value_offset)?,
                            ),
                            [] => {
                                return Err(ParseError::new(
                                    ParseErrorKind::InvalidArray,
                                    value_offset,
                                ));
                            }
                        },
                        _ => {
                            return Err(ParseError::new(
                                ParseErrorKind::MissingValue(keyword.as_str()),
                                value_offset,
                            ));
                        }
                    };
                }
            }
            Keyword::Collapse => {
                let value_offset = self.offset();
                let Some(TokenKind::Parameters(values)) = self.next().map(|t| t.kind) else {
                    return Err(ParseError::new(
                        ParseErrorKind::InvalidParameters,
                        value_offset,
                    ));
                };
                let [x, y, width, height] = values.as_slice() else {
                    return Err(ParseError::new(
                        ParseErrorKind::InvalidParameters,
                        value_offset,
                    ));
                };
                if [x, y, width, height].iter().all(|n| !n.is_negative()) {
                    pending.collapses.push(Collapse {
                        x: x.real() as u32,
                        y: y.real() as u32,
                        width: width.real() as u32,
                        height: height.real() as u32,
                    });
                }
            }
            Keyword::Dock | Keyword::Switchable => pending.set_type(keyword, offset)?,
            Keyword::Vert => pending.vertical = true,
            Keyword::Left => division.side = Some(DockSide::Left),
            Keyword::Right => division.side = Some(DockSide::Right),
            Keyword::Top => division.side = Some(DockSide::Top),
            Keyword::Bottom => division.side = Some(DockSide::Bottom),
            Keyword::Undisplayed => pending.undisplayed = true,
            Keyword::Invisible => pending.invisible = true,
        }
        Ok(())
    }

    fn scan_body(&mut self, pending: &mut Pending, top: bool) -> Result<(), ParseError> {
        loop {
            let Some(token) = self.next() else {
                if top {
                    return Ok(());
                }
                return Err(ParseError::new(ParseErrorKind::UnexpectedEnd, self.end));
            };
            let offset = token.span.start;
            match token.kind {
                TokenKind::DivStart => {
                    let id = self.scan_div(offset, false)?;
                    pending.items.push(Item::Child { id, offset });
                }
                TokenKind::DivEnd if !top => return Ok(()),
                TokenKind::Splitter(weight) => pending.items.push(Item::Splitter(weight)),
                TokenKind::Identifier(name) => {
                    pending.division.name = Some(name);
                    pending.name_offset = offset;
                }
                TokenKind::Keyword(keyword) => self.keyword(pending, keyword, offset)?,
                other => {
                    return Err(ParseError::new(
                        ParseErrorKind::UnexpectedToken(other.describe()),
                        offset,
                    ));
                }
            }
        }
    }

    /// Scan one division starting after its `<` (or at the top level).
    fn scan_div(&mut self, offset: usize, top: bool) -> Result<DivisionId, ParseError> {
        let mut pending = Pending::new(offset);
        self.scan_body(&mut pending, top)
            .map_err(|e| e.with_field(pending.division.name()))?;
        self.finish(pending)
    }

    fn finish(&mut self, mut pending: Pending) -> Result<DivisionId, ParseError> {
        let kind = pending.kind();
        let name = pending.division.name.clone();
        let field_error =
            |kind: ParseErrorKind, offset: usize| ParseError::new(kind, offset).with_field(name.as_deref());

        if let Some(name) = &name {
            if self.names.contains_key(name) {
                return Err(field_error(ParseErrorKind::DuplicateName, pending.name_offset));
            }
            self.names.insert(name.clone(), pending.name_offset);
        }

        let mut division = pending.division;
        division.kind = kind;
        division.display = !pending.undisplayed;
        division.visible = !(pending.undisplayed || pending.invisible);
        division.normalize_bounds();

        let mut children: Vec<DivisionId> = Vec::new();
        let mut offsets: Vec<(DivisionId, usize)> = Vec::new();
        for (i, item) in pending.items.iter().enumerate() {
            match item {
                Item::Child { id, offset } => {
                    children.push(*id);
                    offsets.push((*id, *offset));
                }
                Item::Splitter(weight) => {
                    let Some(previous) = children
                        .last()
                        .copied()
                        .filter(|c| self.tree.get(*c).is_some_and(|d| !d.is_splitter()))
                    else {
                        continue;
                    };
                    if !weight.is_none()
                        && let Some(leaf) = self.tree.get_mut(previous)
                        && leaf.weight.is_none()
                    {
                        leaf.weight = *weight;
                        leaf.normalize_bounds();
                    }
                    let followed_by_child =
                        matches!(pending.items.get(i + 1), Some(Item::Child { .. }));
                    if followed_by_child && matches!(division.kind, DivisionKind::Arrange(_)) {
                        children.push(self.tree.insert(Division::splitter()));
                    }
                }
            }
        }

        for (child, offset) in offsets {
            let Some(child_division) = self.tree.get_mut(child) else {
                continue;
            };
            let expected = match division.kind {
                DivisionKind::Arrange(axis) => Some(axis),
                DivisionKind::Dock => {
                    child_division.make_pane();
                    Some(child_division.dock_side().axis())
                }
                _ => None,
            };
            if let (Some(expected), Some(declared)) = (expected, child_division.weight_axis)
                && expected != declared
            {
                return Err(ParseError::new(ParseErrorKind::AxisContradiction, offset)
                    .with_field(child_division.name()));
            }
        }

        let id = self.tree.insert(division);
        self.tree.set_children(id, children);
        Ok(id)
    }
}
