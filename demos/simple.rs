use grid_util::point::Point;
use tile_pathfinder::TileGrid;

// In this example a path is found on a grid with shape
// S..#....
// ...#....
// ...#....
// ...#....
// ........
// .......E
// S marks the start
// E marks the end
fn main() {
    let mut grid = TileGrid::new(8, 6).unwrap();
    let mut gesture_start = true;
    for y in 0..4 {
        grid.apply_streak_edit(Point::new(3, y), gesture_start);
        gesture_start = false;
    }
    grid.end_streak();
    grid.place_start(Point::new(0, 0));
    if let Some(path) = grid.place_end(Point::new(7, 5)) {
        println!("A path has been found:");
        for p in path {
            println!("{:?}", p);
        }
    }
    println!("{}", grid);
}
