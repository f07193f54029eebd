//! Breadth-first grid search used for connectivity checks and travel queries.

use std::collections::VecDeque;

use manor_core::{Coordinate, Direction};

/// Shortest-path search over 4-connected grid cells.
///
/// Traversability is supplied by the caller, so the same search runs against
/// the feature grid, a furniture what-if view, or a test fixture. An optional
/// region predicate confines the search, e.g. to a single room. Start and
/// target cells are exempt from both predicates.
pub struct Pathfinder<T, R = fn(Coordinate) -> bool> {
    size: Coordinate,
    is_traversable: T,
    region: Option<R>,
}

impl<T> Pathfinder<T>
where
    T: Fn(Coordinate) -> bool,
{
    /// Creates an unrestricted search over a grid of the provided size.
    #[must_use]
    pub fn new(size: Coordinate, is_traversable: T) -> Self {
        Self {
            size,
            is_traversable,
            region: None,
        }
    }
}

impl<T, R> Pathfinder<T, R>
where
    T: Fn(Coordinate) -> bool,
    R: Fn(Coordinate) -> bool,
{
    /// Confines every later search to cells accepted by `region`.
    #[must_use]
    pub fn restricted_to<Q>(self, region: Q) -> Pathfinder<T, Q>
    where
        Q: Fn(Coordinate) -> bool,
    {
        Pathfinder {
            size: self.size,
            is_traversable: self.is_traversable,
            region: Some(region),
        }
    }

    /// Shortest path from `start` to `target`, both included, or `None` when
    /// the target cannot be reached.
    ///
    /// The search runs from the target back toward the start, so following
    /// the predecessor links from the start yields the path in walking order.
    #[must_use]
    pub fn path(&self, start: Coordinate, target: Coordinate) -> Option<Vec<Coordinate>> {
        if !self.in_bounds(start) || !self.in_bounds(target) {
            return None;
        }
        if start == target {
            return Some(vec![start]);
        }

        let grid = self.search(target, |cell| cell == start)?;
        Some(grid.backtrack(start))
    }

    /// Reports whether `target` can be reached from `start`.
    #[must_use]
    pub fn path_exists(&self, start: Coordinate, target: Coordinate) -> bool {
        self.path(start, target).is_some()
    }

    /// Shortest path from `start` to the nearest cell satisfying `stop`, or
    /// `None` when the frontier empties first.
    #[must_use]
    pub fn path_until<P>(&self, start: Coordinate, stop: P) -> Option<Vec<Coordinate>>
    where
        P: Fn(Coordinate) -> bool,
    {
        if !self.in_bounds(start) {
            return None;
        }
        if stop(start) {
            return Some(vec![start]);
        }

        let grid = self.search(start, &stop)?;
        let mut path = grid.backtrack(grid.reached?);
        path.reverse();
        Some(path)
    }

    fn in_bounds(&self, cell: Coordinate) -> bool {
        cell.lies_within(Coordinate::ZERO, self.size)
    }

    fn enterable(&self, cell: Coordinate) -> bool {
        (self.is_traversable)(cell) && self.region.as_ref().map_or(true, |region| region(cell))
    }

    fn search<G>(&self, origin: Coordinate, is_goal: G) -> Option<SearchGrid>
    where
        G: Fn(Coordinate) -> bool,
    {
        let mut grid = SearchGrid::new(self.size);
        let mut queue = VecDeque::new();
        grid.visit(origin, 0, None);
        queue.push_back(origin);

        while let Some(cell) = queue.pop_front() {
            let Some(distance) = grid.distance(cell) else {
                continue;
            };

            for neighbor in neighbors(cell, self.size) {
                if grid.distance(neighbor).is_some() {
                    continue;
                }

                let goal = is_goal(neighbor);
                if !goal && !self.enterable(neighbor) {
                    continue;
                }

                grid.visit(neighbor, distance + 1, Some(cell));
                if goal {
                    grid.reached = Some(neighbor);
                    return Some(grid);
                }
                queue.push_back(neighbor);
            }
        }

        None
    }
}

/// Per-search scratch state: running distances and predecessor links.
struct SearchGrid {
    width: usize,
    distances: Vec<u32>,
    previous: Vec<Option<Coordinate>>,
    reached: Option<Coordinate>,
}

impl SearchGrid {
    fn new(size: Coordinate) -> Self {
        let width = usize::try_from(size.x()).unwrap_or(0);
        let height = usize::try_from(size.y()).unwrap_or(0);
        let cell_count = width.checked_mul(height).unwrap_or(0);
        Self {
            width,
            distances: vec![u32::MAX; cell_count],
            previous: vec![None; cell_count],
            reached: None,
        }
    }

    fn distance(&self, cell: Coordinate) -> Option<u32> {
        let offset = index(self.width, cell)?;
        self.distances
            .get(offset)
            .copied()
            .filter(|distance| *distance != u32::MAX)
    }

    fn visit(&mut self, cell: Coordinate, distance: u32, previous: Option<Coordinate>) {
        let Some(offset) = index(self.width, cell) else {
            return;
        };
        if offset < self.distances.len() {
            self.distances[offset] = distance;
            self.previous[offset] = previous;
        }
    }

    fn previous_of(&self, cell: Coordinate) -> Option<Coordinate> {
        let offset = index(self.width, cell)?;
        self.previous.get(offset).copied().flatten()
    }

    /// Follows predecessor links from `from` back to the search origin.
    fn backtrack(&self, from: Coordinate) -> Vec<Coordinate> {
        let mut path = vec![from];
        let mut cell = from;
        while let Some(previous) = self.previous_of(cell) {
            path.push(previous);
            cell = previous;
        }
        path
    }
}

fn neighbors(cell: Coordinate, size: Coordinate) -> impl Iterator<Item = Coordinate> {
    Direction::ALL
        .into_iter()
        .map(move |direction| cell.step(direction))
        .filter(move |neighbor| neighbor.lies_within(Coordinate::ZERO, size))
}

fn index(width: usize, cell: Coordinate) -> Option<usize> {
    let column = usize::try_from(cell.x()).ok()?;
    let row = usize::try_from(cell.y()).ok()?;
    row.checked_mul(width)?.checked_add(column)
}
