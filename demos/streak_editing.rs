use grid_util::point::Point;
use tile_pathfinder::TileGrid;

// Demonstrates the streak rule: a drag gesture is locked to placing or
// clearing obstacles by the first cell it touches, and the path is re-solved
// after every touched cell.
fn main() {
    let mut grid = TileGrid::new(10, 6).unwrap();
    grid.place_start(Point::new(0, 2));
    grid.place_end(Point::new(9, 2));
    println!("Initial path:\n{}", grid);

    // Drag a wall down column 4. The first cell is empty, so the whole
    // gesture places obstacles.
    let mut gesture_start = true;
    for y in 0..5 {
        grid.apply_streak_edit(Point::new(4, y), gesture_start);
        gesture_start = false;
    }
    println!("After dragging a wall ({:?}):\n{}", grid.streak_mode(), grid);
    grid.end_streak();

    // A second drag starting on a wall cell clears obstacles instead.
    grid.apply_streak_edit(Point::new(4, 2), true);
    grid.end_streak();
    println!("After clearing one wall cell:\n{}", grid);

    if let Some(path) = grid.last_path() {
        println!("Current path has {} tiles", path.len());
    }
}
