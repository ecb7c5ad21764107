//! # Pathfinding Algorithms
//!
//! A* over the 8-connected grid and a breadth-first search for the nearest tile matching a
//! predicate.

use crate::game::Position;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};

/// Node for A* pathfinding algorithm.
#[derive(Debug, Clone)]
pub struct AStarNode {
    pub position: Position,
    pub f_score: f64,
}

impl PartialEq for AStarNode {
    fn eq(&self, other: &Self) -> bool {
        self.f_score == other.f_score
    }
}

impl Eq for AStarNode {}

impl PartialOrd for AStarNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AStarNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior in BinaryHeap
        other
            .f_score
            .partial_cmp(&self.f_score)
            .unwrap_or(Ordering::Equal)
    }
}

/// Finds a path from `start` to `goal`.
///
/// The returned path excludes `start` and ends at `goal`. `goal` is always enterable, so a path
/// can end on a monster or a closed tile the caller means to bump.
pub fn find_path<F>(start: Position, goal: Position, passable: F) -> Option<Vec<Position>>
where
    F: Fn(Position) -> bool,
{
    if start == goal {
        return Some(Vec::new());
    }

    let mut open_set = BinaryHeap::new();
    let mut closed = HashSet::new();
    let mut came_from = HashMap::new();
    let mut g_score = HashMap::new();

    g_score.insert(start, 0.0);
    open_set.push(AStarNode {
        position: start,
        f_score: start.euclidean_distance(goal),
    });

    while let Some(current_node) = open_set.pop() {
        let current = current_node.position;

        if current == goal {
            let mut path = Vec::new();
            let mut current_pos = goal;
            while let Some(&prev) = came_from.get(&current_pos) {
                path.push(current_pos);
                current_pos = prev;
            }
            path.reverse();
            return Some(path);
        }

        if !closed.insert(current) {
            continue;
        }

        let current_g = g_score.get(&current).copied().unwrap_or(f64::INFINITY);
        for neighbor in current.adjacent_positions() {
            if neighbor != goal && !passable(neighbor) {
                continue;
            }

            let tentative_g_score = current_g + 1.0;
            if tentative_g_score < g_score.get(&neighbor).copied().unwrap_or(f64::INFINITY) {
                came_from.insert(neighbor, current);
                g_score.insert(neighbor, tentative_g_score);
                open_set.push(AStarNode {
                    position: neighbor,
                    f_score: tentative_g_score + neighbor.euclidean_distance(goal),
                });
            }
        }
    }

    None
}

/// Breadth-first search for the closest position satisfying `is_goal`.
///
/// Returns the path to it, excluding `start`.
pub fn find_nearest<F, G>(start: Position, passable: F, is_goal: G) -> Option<Vec<Position>>
where
    F: Fn(Position) -> bool,
    G: Fn(Position) -> bool,
{
    let mut queue = VecDeque::new();
    let mut came_from: HashMap<Position, Position> = HashMap::new();
    let mut visited = HashSet::new();

    queue.push_back(start);
    visited.insert(start);

    while let Some(current) = queue.pop_front() {
        if current != start && is_goal(current) {
            let mut path = vec![current];
            let mut pos = current;
            while let Some(&prev) = came_from.get(&pos) {
                if prev == start {
                    break;
                }
                path.push(prev);
                pos = prev;
            }
            path.reverse();
            return Some(path);
        }

        for neighbor in current.adjacent_positions() {
            if visited.contains(&neighbor) || !passable(neighbor) {
                continue;
            }
            visited.insert(neighbor);
            came_from.insert(neighbor, current);
            queue.push_back(neighbor);
        }
    }

    None
}
