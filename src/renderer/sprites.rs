//! Pixel-art sprite masks
//!
//! Each sprite is a grid of rows where `#` is a filled cell and `.` is empty.
//! Cells are drawn as squares of [`PIXEL`](crate::consts::PIXEL) world units.

use super::DrawContext;

/// A static one-color bitmap mask
#[derive(Debug, Clone, Copy)]
pub struct Sprite {
    rows: &'static [&'static str],
}

impl Sprite {
    pub const fn new(rows: &'static [&'static str]) -> Self {
        Self { rows }
    }

    /// Width in cells
    pub fn width(&self) -> usize {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0)
    }

    /// Height in cells
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn is_filled(&self, col: usize, row: usize) -> bool {
        self.rows
            .get(row)
            .and_then(|r| r.as_bytes().get(col))
            .is_some_and(|&c| c == b'#')
    }

    /// Horizontal runs of filled cells as (row, first column, length)
    pub fn runs(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, line)| {
            let bytes = line.as_bytes();
            let mut runs = Vec::new();
            let mut col = 0;
            while col < bytes.len() {
                if bytes[col] == b'#' {
                    let start = col;
                    while col < bytes.len() && bytes[col] == b'#' {
                        col += 1;
                    }
                    runs.push((row, start, col - start));
                } else {
                    col += 1;
                }
            }
            runs
        })
    }

    /// Paint with the current fill, one rect per horizontal run
    pub fn draw(&self, ctx: &mut dyn DrawContext, x: f32, y: f32, cell: f32) {
        for (row, col, len) in self.runs() {
            ctx.fill_rect(
                x + col as f32 * cell,
                y + row as f32 * cell,
                len as f32 * cell,
                cell,
            );
        }
    }
}

/// Standing / airborne pose
pub const DINO_STAND: Sprite = Sprite::new(&[
    "........######....",
    ".......########...",
    ".......##.#####...",
    ".......########...",
    ".......#######....",
    ".......#####......",
    "...#...######.....",
    "...#..##########..",
    "..##..########....",
    "..###########.....",
    ".#############....",
    ".############.....",
    "###########.......",
    "#.########........",
    "...#######........",
    "....######........",
    ".....####.........",
    ".....##.##........",
    ".....##..##.......",
    "....###..###......",
]);

/// Run cycle, back leg planted
pub const DINO_STRIDE_A: Sprite = Sprite::new(&[
    "........######....",
    ".......########...",
    ".......##.#####...",
    ".......########...",
    ".......#######....",
    ".......#####......",
    "...#...######.....",
    "...#..##########..",
    "..##..########....",
    "..###########.....",
    ".#############....",
    ".############.....",
    "###########.......",
    "#.########........",
    "...#######........",
    "....######........",
    ".....####.........",
    ".....##...........",
    "........##........",
    "........###.......",
]);

/// Run cycle, front leg planted
pub const DINO_STRIDE_B: Sprite = Sprite::new(&[
    "........######....",
    ".......########...",
    ".......##.#####...",
    ".......########...",
    ".......#######....",
    ".......#####......",
    "...#...######.....",
    "...#..##########..",
    "..##..########....",
    "..###########.....",
    ".#############....",
    ".############.....",
    "###########.......",
    "#.########........",
    "...#######........",
    "....######........",
    ".....####.........",
    "........##........",
    ".....##...........",
    ".....###..........",
]);

/// Single-stem cactus (8x14 cells)
pub const CACTUS_SMALL: Sprite = Sprite::new(&[
    "...##...",
    "...##...",
    "...##...",
    "#..##...",
    "#..##..#",
    "#..##..#",
    "##.##..#",
    ".####.##",
    "..####..",
    "...##...",
    "...##...",
    "...##...",
    "...##...",
    "...##...",
]);

/// Double cactus (12x16 cells)
pub const CACTUS_LARGE: Sprite = Sprite::new(&[
    "...##.......",
    "...##...##..",
    "...##...##..",
    "#..##...##..",
    "#..##...##.#",
    "#..##.#.##.#",
    "##.##.#.####",
    ".#########..",
    "..######....",
    "...####.....",
    "...####.....",
    "...####.....",
    "...####.....",
    "...####.....",
    "...####.....",
    "...####.....",
]);

pub const BIRD_WINGS_UP: Sprite = Sprite::new(&[
    "..#....#..",
    ".##....##.",
    "##########",
    "..######..",
    "...####...",
]);

pub const BIRD_WINGS_DOWN: Sprite = Sprite::new(&[
    "...####...",
    "..######..",
    "##########",
    ".##....##.",
    "..#....#..",
]);
