use std::collections::VecDeque;

use derive_more::Display;
use nonmax::NonMaxU32;
use thiserror::Error;

use crate::space::Graph;
use crate::space::Heuristic;

const MAX_ELEMENTS_DISPLAYED: usize = 80;

// Simple colours
const WHITE: [u8; 3] = [u8::MAX, u8::MAX, u8::MAX];
const BLACK: [u8; 3] = [u8::MIN, u8::MIN, u8::MIN];
const GREEN: [u8; 3] = [u8::MIN, u8::MAX, u8::MIN];
const BLUE: [u8; 3] = [u8::MIN, u8::MIN, u8::MAX];

pub type CoordIntrinsic = u32;
pub type Coord = NonMaxU32;

/// A cell position. `x` is the column, `y` the row.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display("({x},{y})")]
pub struct Maze2DState {
    pub(crate) x: Coord,
    pub(crate) y: Coord,
}

impl Maze2DState {
    pub fn new(x: CoordIntrinsic, y: CoordIntrinsic) -> Option<Maze2DState> {
        Some(Maze2DState {
            x: Coord::new(x)?,
            y: Coord::new(y)?,
        })
    }
    pub fn new_from_usize(x: usize, y: usize) -> Option<Maze2DState> {
        let x = CoordIntrinsic::try_from(x).ok()?;
        let y = CoordIntrinsic::try_from(y).ok()?;
        Self::new(x, y)
    }

    pub fn x(&self) -> CoordIntrinsic {
        self.x.get()
    }
    pub fn y(&self) -> CoordIntrinsic {
        self.y.get()
    }
}

/// Unit moves: every step costs one.
pub type Maze2DCost = u32;

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum Maze2DCell {
    #[display("░")]
    Empty,
    #[display("█")]
    Wall,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Maze2DCellParseError {
    #[error("Invalid character '{0}' found.")]
    InvalidCharacter(char),
}

impl std::convert::TryFrom<char> for Maze2DCell {
    type Error = Maze2DCellParseError;

    fn try_from(ch: char) -> Result<Self, Self::Error> {
        match ch {
            ' ' | '.' | '0' => Ok(Maze2DCell::Empty),
            '#' | '█' | '1' => Ok(Maze2DCell::Wall),
            ch => Err(Maze2DCellParseError::InvalidCharacter(ch)),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Maze2DGenerationError {
    #[error("Maze dimensions must be odd and at least 3x3, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
}

/// A 4-connected grid.
#[derive(Clone, PartialEq, Eq)]
pub struct Maze2DSpace {
    pub(crate) map: Vec<Vec<Maze2DCell>>,
}

impl Maze2DSpace {
    pub fn new_from_map(map: Vec<Vec<Maze2DCell>>) -> Self {
        Self { map }
    }
    pub(crate) fn new_filled_with_dimensions(x: usize, y: usize, cell: Maze2DCell) -> Self {
        Self {
            map: vec![vec![cell; x]; y],
        }
    }

    /// `(width, height)`
    pub fn dimensions(&self) -> (usize, usize) {
        if self.map.is_empty() {
            return (0, 0);
        }
        (self.map[0].len(), self.map.len())
    }

    pub fn cell(&self, state: &Maze2DState) -> Option<Maze2DCell> {
        self.map
            .get(state.y() as usize)?
            .get(state.x() as usize)
            .copied()
    }

    /// Carves a maze with randomized depth-first backtracking.
    ///
    /// Cells at odd coordinates are rooms, the rest start as walls; `(1,1)` is
    /// carved first and every room ends up connected to it.
    pub fn generate<R: rand::Rng>(
        width: usize,
        height: usize,
        r: &mut R,
    ) -> Result<Self, Maze2DGenerationError> {
        if width < 3 || height < 3 || width % 2 == 0 || height % 2 == 0 {
            return Err(Maze2DGenerationError::InvalidDimensions { width, height });
        }
        if Maze2DState::new_from_usize(width, height).is_none() {
            return Err(Maze2DGenerationError::InvalidDimensions { width, height });
        }

        let mut space = Self::new_filled_with_dimensions(width, height, Maze2DCell::Wall);
        space.map[1][1] = Maze2DCell::Empty;
        let mut stack = vec![(1usize, 1usize)];

        while let Some(&(x, y)) = stack.last() {
            let mut rooms = smallvec::SmallVec::<[(usize, usize); 4]>::new();
            for (dx, dy) in [(2isize, 0isize), (-2, 0), (0, 2), (0, -2)] {
                let (nx, ny) = (x as isize + dx, y as isize + dy);
                if 0 < nx
                    && nx < width as isize - 1
                    && 0 < ny
                    && ny < height as isize - 1
                    && space.map[ny as usize][nx as usize] == Maze2DCell::Wall
                {
                    rooms.push((nx as usize, ny as usize));
                }
            }

            if rooms.is_empty() {
                stack.pop();
                continue;
            }
            let (nx, ny) = rooms[r.random_range(0..rooms.len())];
            // Knock down the wall in between
            space.map[(y + ny) / 2][(x + nx) / 2] = Maze2DCell::Empty;
            space.map[ny][nx] = Maze2DCell::Empty;
            stack.push((nx, ny));
        }

        Ok(space)
    }

    /// Shortest number of moves between two cells, by breadth-first search.
    pub fn bfs_distance(&self, from: &Maze2DState, to: &Maze2DState) -> Option<Maze2DCost> {
        if !self.contains(from) || !self.contains(to) {
            return None;
        }

        let mut distance = rustc_hash::FxHashMap::default();
        distance.insert(*from, 0 as Maze2DCost);
        let mut todo = VecDeque::from([*from]);
        while let Some(s) = todo.pop_front() {
            let d = distance[&s];
            if s == *to {
                return Some(d);
            }
            for (n, c) in self.neighbours(&s) {
                distance.entry(n).or_insert_with(|| {
                    todo.push_back(n);
                    d + c
                });
            }
        }
        None
    }

    pub fn open_cells(&self) -> usize {
        self.map
            .iter()
            .flatten()
            .filter(|c| **c == Maze2DCell::Empty)
            .count()
    }
}

impl Graph<Maze2DState, Maze2DCost> for Maze2DSpace {
    /// Open cells only.
    #[inline(always)]
    fn contains(&self, state: &Maze2DState) -> bool {
        self.cell(state) == Some(Maze2DCell::Empty)
    }

    /// Gets the open cells next to a given position.
    ///
    /// Rows above and below first, then columns left and right.
    fn neighbours(&self, state: &Maze2DState) -> Vec<(Maze2DState, Maze2DCost)> {
        #[cfg(feature = "coz_profile")]
        coz::scope!("StateExpansion");

        let mut v = Vec::<(Maze2DState, Maze2DCost)>::with_capacity(4);
        let (x, y) = (state.x(), state.y());

        let prev = CoordIntrinsic::MAX;
        let same = 0 as CoordIntrinsic;
        let next = 1 as CoordIntrinsic;

        for (dx, dy) in [(same, prev), (same, next), (prev, same), (next, same)] {
            let Some(s) = Maze2DState::new(x.wrapping_add(dx), y.wrapping_add(dy)) else {
                continue;
            };
            if self.contains(&s) {
                v.push((s, 1));
            }
        }
        v
    }

    fn size(&self) -> Option<usize> {
        Some(self.open_cells())
    }
}

impl std::fmt::Display for Maze2DSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let d = self.dimensions();
        writeln!(f, "Maze2D({}x{}):", d.0, d.1)?;
        for line in self.map.iter().take(MAX_ELEMENTS_DISPLAYED) {
            for cell in line.iter().take(MAX_ELEMENTS_DISPLAYED) {
                write!(f, "{cell}")?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl std::fmt::Debug for Maze2DSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Maze2D{:?}", self.dimensions())
    }
}

/// Manhattan distance to a fixed goal cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Maze2DManhattan {
    pub goal: Maze2DState,
}

impl Heuristic<Maze2DState, Maze2DCost> for Maze2DManhattan {
    #[inline(always)]
    fn h(&self, s: &Maze2DState) -> Option<Maze2DCost> {
        let dx = s.x().abs_diff(self.goal.x());
        let dy = s.y().abs_diff(self.goal.y());
        dx.checked_add(dy)
    }
}

#[derive(Copy, Clone, Debug, Display, PartialEq)]
pub enum Maze2DProblemCell {
    Cell(Maze2DCell),
    #[display("S")]
    Start,
    #[display("G")]
    Goal,
}

impl std::convert::TryFrom<char> for Maze2DProblemCell {
    type Error = Maze2DCellParseError;

    fn try_from(ch: char) -> Result<Self, Self::Error> {
        match ch {
            'S' => Ok(Maze2DProblemCell::Start),
            'G' => Ok(Maze2DProblemCell::Goal),
            ch => Ok(Maze2DProblemCell::Cell(Maze2DCell::try_from(ch)?)),
        }
    }
}

#[derive(Debug, Error)]
pub enum Maze2DParseError {
    #[error("Empty input")]
    EmptyInput,
    #[error("Invalid cell {e} found at ({x},{y})")]
    InvalidCell {
        e: Maze2DCellParseError,
        x: usize,
        y: usize,
    },
    #[error("Row {y} has {found} cells, expected {expected}")]
    RaggedRow {
        y: usize,
        expected: usize,
        found: usize,
    },
    #[error("Maze of {x}x{y} is too large")]
    TooLarge { x: usize, y: usize },
    #[error("More than one '{marker}' found, the second one at ({x},{y})")]
    DuplicateMarker { marker: char, x: usize, y: usize },
    #[error("No start cell")]
    MissingStart,
    #[error("No goal cell")]
    MissingGoal,
    #[error("I/O error when loading '{p}': {e}")]
    IOError {
        p: std::path::PathBuf,
        e: std::io::Error,
    },
    #[error("Image error when loading '{p}': {e}")]
    ImageError {
        p: std::path::PathBuf,
        e: image::ImageError,
    },
}

/// A maze with optional start and goal cells.
#[derive(Clone, Debug)]
pub struct Maze2DProblem {
    pub space: Maze2DSpace,
    pub start: Option<Maze2DState>,
    pub goal: Option<Maze2DState>,
}

/// A maze with both endpoints, plus the heuristic towards the goal.
#[derive(Clone, Debug)]
pub struct Maze2DInstance {
    pub space: Maze2DSpace,
    pub heuristic: Maze2DManhattan,
    pub start: Maze2DState,
    pub goal: Maze2DState,
}

impl Maze2DProblem {
    pub fn instance(self) -> Result<Maze2DInstance, Maze2DParseError> {
        let start = self.start.ok_or(Maze2DParseError::MissingStart)?;
        let goal = self.goal.ok_or(Maze2DParseError::MissingGoal)?;
        Ok(Maze2DInstance {
            space: self.space,
            heuristic: Maze2DManhattan { goal },
            start,
            goal,
        })
    }

    fn mark(
        slot: &mut Option<Maze2DState>,
        marker: char,
        x: usize,
        y: usize,
    ) -> Result<(), Maze2DParseError> {
        if slot.is_some() {
            return Err(Maze2DParseError::DuplicateMarker { marker, x, y });
        }
        *slot = Some(Maze2DState::new_from_usize(x, y).ok_or(Maze2DParseError::TooLarge { x, y })?);
        Ok(())
    }
}

impl std::convert::From<Maze2DSpace> for Maze2DProblem {
    /// Lifts a Space into a Problem without endpoints.
    fn from(space: Maze2DSpace) -> Self {
        Maze2DProblem {
            space,
            start: None,
            goal: None,
        }
    }
}

impl std::convert::TryFrom<&str> for Maze2DProblem {
    type Error = Maze2DParseError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        // Blank lines only count around the maze, a row of spaces inside it is floor.
        let mut lines: Vec<&str> = s.lines().skip_while(|l| l.is_empty()).collect();
        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        if lines.is_empty() {
            return Err(Maze2DParseError::EmptyInput);
        }

        let max_x = lines[0].chars().count();
        let max_y = lines.len();
        if Maze2DState::new_from_usize(max_x, max_y).is_none() {
            return Err(Maze2DParseError::TooLarge { x: max_x, y: max_y });
        }

        let mut problem = Maze2DProblem::from(Maze2DSpace::new_filled_with_dimensions(
            max_x,
            max_y,
            Maze2DCell::Empty,
        ));
        for (y, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != max_x {
                return Err(Maze2DParseError::RaggedRow {
                    y,
                    expected: max_x,
                    found,
                });
            }

            for (x, ch) in line.chars().enumerate() {
                let cell = Maze2DProblemCell::try_from(ch)
                    .map_err(|e| Maze2DParseError::InvalidCell { e, x, y })?;

                problem.space.map[y][x] = match cell {
                    Maze2DProblemCell::Start => {
                        Self::mark(&mut problem.start, 'S', x, y)?;
                        Maze2DCell::Empty
                    }
                    Maze2DProblemCell::Goal => {
                        Self::mark(&mut problem.goal, 'G', x, y)?;
                        Maze2DCell::Empty
                    }
                    Maze2DProblemCell::Cell(c) => c,
                }
            }
        }

        Ok(problem)
    }
}

impl std::convert::TryFrom<&std::path::Path> for Maze2DProblem {
    type Error = Maze2DParseError;

    /// Loads `.png` images (black walls, blue start, green goal) or text mazes.
    fn try_from(p: &std::path::Path) -> Result<Self, Self::Error> {
        use image::ImageReader;
        use image::Rgb;

        let is_image = p
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("png"));
        if !is_image {
            let s = std::fs::read_to_string(p).map_err(|e| Maze2DParseError::IOError {
                p: p.to_path_buf(),
                e,
            })?;
            return Maze2DProblem::try_from(s.as_str());
        }

        let img = ImageReader::open(p)
            .map_err(|e| Maze2DParseError::IOError {
                p: p.to_path_buf(),
                e,
            })?
            .decode()
            .map_err(|e| Maze2DParseError::ImageError {
                p: p.to_path_buf(),
                e,
            })?
            .into_rgb8();

        let max_x = img.width() as usize;
        let max_y = img.height() as usize;
        if Maze2DState::new_from_usize(max_x, max_y).is_none() {
            return Err(Maze2DParseError::TooLarge { x: max_x, y: max_y });
        }

        let mut problem = Maze2DProblem::from(Maze2DSpace::new_filled_with_dimensions(
            max_x,
            max_y,
            Maze2DCell::Empty,
        ));
        for (x, y, px) in img.enumerate_pixels() {
            let (x, y) = (x as usize, y as usize);
            let px: &Rgb<u8> = px;

            problem.space.map[y][x] = match px.0 {
                BLACK => Maze2DCell::Wall,
                WHITE => Maze2DCell::Empty,
                GREEN => {
                    Self::mark(&mut problem.goal, 'G', x, y)?;
                    Maze2DCell::Empty
                }
                BLUE => {
                    Self::mark(&mut problem.start, 'S', x, y)?;
                    Maze2DCell::Empty
                }
                _ => Maze2DCell::Empty,
            }
        }

        Ok(problem)
    }
}

impl std::fmt::Display for Maze2DProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let d = self.space.dimensions();
        writeln!(
            f,
            "Maze2DProblem({}x{}) (s:{:?}, g:{:?}):",
            d.0, d.1, self.start, self.goal
        )?;
        for (y, line) in self.space.map.iter().enumerate().take(MAX_ELEMENTS_DISPLAYED) {
            for (x, cell) in line.iter().enumerate().take(MAX_ELEMENTS_DISPLAYED) {
                let s = Maze2DState::new_from_usize(x, y);
                let is_start = s.is_some() && s == self.start;
                let is_goal = s.is_some() && s == self.goal;

                match (is_start, is_goal) {
                    (true, true) => write!(f, "!")?,
                    (true, false) => write!(f, "S")?,
                    (false, true) => write!(f, "G")?,
                    (false, false) => write!(f, "{cell}")?,
                }
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
