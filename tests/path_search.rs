//! A* path lengths checked against a breadth-first oracle on random mazes.

use mazechase::ai::{find_path, find_tile_path, manhattan};
use mazechase::components::TilePos;
use mazechase::maze::MazeGrid;
use pathfinding::prelude::bfs;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_maze(rng: &mut StdRng, width: usize, height: usize) -> MazeGrid {
    let rows: Vec<String> = (0..height)
        .map(|y| {
            (0..width)
                .map(|x| {
                    let border = x == 0 || y == 0 || x == width - 1 || y == height - 1;
                    if border || rng.gen_bool(0.3) { 'W' } else { ' ' }
                })
                .collect()
        })
        .collect();
    MazeGrid::parse(&rows, 50.0).unwrap()
}

fn oracle(maze: &MazeGrid, start: TilePos, goal: TilePos) -> Option<usize> {
    bfs(
        &start,
        |p: &TilePos| maze.neighbors(*p).collect::<Vec<_>>(),
        |p| *p == goal,
    )
    .map(|path| path.len() - 1)
}

#[test]
fn astar_matches_bfs_lengths() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut reachable = 0;
    let mut unreachable = 0;

    for _ in 0..40 {
        let maze = random_maze(&mut rng, 14, 10);
        let floor = maze.walkable_tiles();
        if floor.len() < 2 {
            continue;
        }
        for _ in 0..15 {
            let start = floor[rng.gen_range(0..floor.len())];
            let goal = floor[rng.gen_range(0..floor.len())];
            if start == goal {
                continue;
            }
            let path = find_tile_path(start, goal, |p| maze.is_walkable(p));
            match oracle(&maze, start, goal) {
                Some(len) => {
                    reachable += 1;
                    assert_eq!(path.len(), len, "{start:?} -> {goal:?}\n{maze}");
                    assert_eq!(path.last(), Some(&goal));
                    let mut prev = start;
                    for step in &path {
                        assert_eq!(manhattan(prev, *step), 1);
                        assert!(maze.is_walkable(*step));
                        prev = *step;
                    }
                }
                None => {
                    unreachable += 1;
                    assert!(path.is_empty(), "{start:?} -> {goal:?}\n{maze}");
                }
            }
        }
    }

    // The seed exercises both outcomes.
    assert!(reachable > 0);
    assert!(unreachable > 0);
}

#[test]
fn classic_layout_corners_are_connected() {
    let maze = MazeGrid::from_text(mazechase::maze::CLASSIC_LAYOUT, 50.0).unwrap();
    let start = TilePos::new(1, 1);
    let goal = TilePos::new(18, 12);
    let waypoints = find_path(&maze, start, goal);
    let expected = oracle(&maze, start, goal).unwrap();
    assert_eq!(waypoints.len(), expected);
    assert_eq!(waypoints.last().copied(), Some(maze.tile_center(goal)));
}
