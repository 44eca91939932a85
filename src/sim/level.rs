//! Brick layout generation

use rand::Rng;

use super::entities::{Brick, BrickColor, Rect};
use crate::config::GameConfig;

/// Generate the full brick grid for a level
///
/// The layout is the same on every level; from `special_from_level` onward each
/// brick independently rolls the special flag.
pub fn generate_bricks<R: Rng + ?Sized>(config: &GameConfig, level: u32, rng: &mut R) -> Vec<Brick> {
    let b = &config.bricks;
    let specials_active = level >= b.special_from_level;
    let mut bricks = Vec::with_capacity((b.rows * b.cols) as usize);

    for row in 0..b.rows {
        for col in 0..b.cols {
            let special = specials_active && rng.random_bool(b.special_chance);
            let x = col as f32 * (b.width + b.gap) + b.offset_left;
            let y = row as f32 * (b.height + b.gap) + b.offset_top;
            bricks.push(Brick {
                rect: Rect::new(x, y, b.width, b.height),
                color: BrickColor::for_row(row),
                special,
            });
        }
    }

    let specials = bricks.iter().filter(|brick| brick.special).count();
    log::debug!(
        "Level {}: {} bricks ({} special)",
        level,
        bricks.len(),
        specials
    );
    bricks
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_grid_layout() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let bricks = generate_bricks(&config, 1, &mut rng);

        assert_eq!(bricks.len(), 50);
        assert_eq!(bricks[0].rect, Rect::new(35.0, 50.0, 60.0, 20.0));
        // Row 1, col 2
        assert_eq!(bricks[12].rect.x, 2.0 * 70.0 + 35.0);
        assert_eq!(bricks[12].rect.y, 80.0);
        assert_eq!(bricks[12].color, BrickColor::Green);
    }

    #[test]
    fn test_no_specials_on_level_one() {
        let mut config = GameConfig::default();
        config.bricks.special_chance = 1.0;
        let mut rng = Pcg32::seed_from_u64(7);
        let bricks = generate_bricks(&config, 1, &mut rng);
        assert!(bricks.iter().all(|b| !b.special));
    }

    #[test]
    fn test_specials_from_level_two() {
        let mut config = GameConfig::default();
        config.bricks.special_chance = 1.0;
        let mut rng = Pcg32::seed_from_u64(7);
        let bricks = generate_bricks(&config, 2, &mut rng);
        assert!(bricks.iter().all(|b| b.special));
    }

    #[test]
    fn test_bricks_do_not_overlap() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let bricks = generate_bricks(&config, 1, &mut rng);
        for (i, a) in bricks.iter().enumerate() {
            for b in &bricks[i + 1..] {
                assert!(!a.rect.intersects(&b.rect));
            }
        }
    }
}
