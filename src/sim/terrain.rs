//! Procedural terrain and coin placement
//!
//! Each call to `generate_next` produces one platform past the current tail,
//! plus the coins that go with it. The only hard rule is reachability: the
//! gap must be clearable by a single grounded jump at the current speed,
//! shrunk further when the new platform sits higher than the old one.
//!
//! Geometry only. Entity IDs are handed out by the lifecycle manager.

use glam::Vec2;
use rand::Rng;

use super::collision::Rect;
use super::state::{BONUS_COIN_VALUE, COIN_VALUE, Platform, PlatformKind};
use crate::config::{ABSOLUTE_MIN_GAP, GameConfig, ReachLimits};
use crate::consts::*;

/// Height variance: chance of a height change, growing with difficulty
const BASE_VOLATILITY: f32 = 0.3;
const VOLATILITY_PER_DIFFICULTY: f32 = 0.05;
const MAX_VOLATILITY: f32 = 0.8;

/// Platforms never go above this y
const MIN_PLATFORM_Y: f32 = 150.0;
/// ...or lower than this far above the viewport bottom
const FLOOR_CLEARANCE: f32 = 80.0;
/// A rise is only attempted from below this y
const RISE_THRESHOLD_Y: f32 = 200.0;
/// Rises never take the player closer than this to the top of the screen
const CEILING_CLEARANCE: f32 = 100.0;
/// A drop is only attempted from above this distance to the viewport bottom
const DROP_MARGIN: f32 = 150.0;
/// Largest rise as a fraction of the apex height
const MAX_RISE_FRACTION: f32 = 0.875;
/// Every height change is at least this big
const MIN_STEP: f32 = 40.0;
const MAX_DROP_SPREAD: f32 = 200.0;

/// Max gap shrinks by up to this fraction on a full-height rise
const UPHILL_PENALTY: f32 = 0.7;
const BASE_MIN_GAP: f32 = 100.0;
const GAP_PER_DIFFICULTY: f32 = 60.0;
const MAX_GAP_BONUS: f32 = 300.0;
/// Keeps the minimum gap this far under the maximum
const GAP_HEADROOM: f32 = 50.0;

/// Platform width bounds narrow with difficulty
const NARROW_PER_DIFFICULTY: f32 = 20.0;
const MAX_NARROW: f32 = 150.0;
const MIN_WIDTH_FLOOR: f32 = 80.0;
const MIN_WIDTH_BASE: f32 = 200.0;
const MAX_WIDTH_FLOOR: f32 = 200.0;
const MAX_WIDTH_BASE: f32 = 600.0;

/// Chance that a platform carries coins at all
const COIN_CHANCE: f64 = 0.8;
const LINE_SPACING: f32 = COIN_SIZE * 1.5;
const LINE_MAX_COINS: usize = 5;
const ARC_MIN_GAP: f32 = 150.0;
const ARC_PEAK_LIFT: f32 = 80.0;
const GRID_MIN_WIDTH: f32 = 150.0;
const GRID_SPACING: f32 = 40.0;

/// Coin layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoinPattern {
    /// Row along the platform top
    Line,
    /// Three coins over the gap, bonus coin at the peak
    Arc,
    /// 2x2 block above a wide platform
    Grid,
    /// One coin hugging the surface
    Single,
}

impl CoinPattern {
    const ALL: [CoinPattern; 4] = [
        CoinPattern::Line,
        CoinPattern::Arc,
        CoinPattern::Grid,
        CoinPattern::Single,
    ];
}

/// Where to put a coin and what it is worth
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoinSpawn {
    /// Top-left corner
    pub pos: Vec2,
    pub value: u32,
}

/// One generator output
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub platform: Rect,
    pub coins: Vec<CoinSpawn>,
    /// Horizontal distance from the previous platform's right edge
    pub gap: f32,
    /// Largest gap that was allowed for this platform
    pub max_gap: f32,
    /// Pattern used, if any coins were placed
    pub pattern: Option<CoinPattern>,
}

/// The starting floor: one platform spanning the whole viewport
pub fn initial_platforms(id: u32) -> Vec<Platform> {
    vec![Platform {
        id,
        kind: PlatformKind::Ground,
        rect: Rect::new(
            0.0,
            VIEWPORT_HEIGHT - GROUND_HEIGHT,
            VIEWPORT_WIDTH,
            GROUND_HEIGHT,
        ),
    }]
}

/// Generate the platform after `last`.
///
/// `speed` must be the current forward speed; since speed never drops
/// within a run, a gap reachable now stays reachable.
pub fn generate_next(
    last: &Rect,
    difficulty: f32,
    speed: f32,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> Segment {
    let difficulty = difficulty.max(0.0);
    let reach = config.reach();
    let flat_gap = reach.max_flat_gap(speed);

    let mut y = pick_height(last.y, difficulty, &reach, rng);
    let mut max_gap = uphill_max_gap(flat_gap, last.y - y, &reach);
    if max_gap < ABSOLUTE_MIN_GAP {
        // Rise too steep for any legal gap at this speed; stay level
        y = last.y;
        max_gap = flat_gap;
    }

    let gap = pick_gap(max_gap, difficulty, rng);
    let width = pick_width(difficulty, rng);
    let platform = Rect::new(last.right() + gap, y, width, PLATFORM_THICKNESS);

    let pattern = if rng.random_bool(COIN_CHANCE) {
        Some(CoinPattern::ALL[rng.random_range(0..CoinPattern::ALL.len())])
    } else {
        None
    };
    let coins = pattern
        .map(|p| pattern_coins(p, &platform, last, gap))
        .unwrap_or_default();
    let pattern = pattern.filter(|_| !coins.is_empty());

    Segment {
        platform,
        coins,
        gap,
        max_gap,
        pattern,
    }
}

/// Next platform top, possibly moved up or down from `last_y`
fn pick_height(last_y: f32, difficulty: f32, reach: &ReachLimits, rng: &mut impl Rng) -> f32 {
    let volatility = (BASE_VOLATILITY + difficulty * VOLATILITY_PER_DIFFICULTY).min(MAX_VOLATILITY);
    if rng.random::<f32>() >= volatility {
        return last_y;
    }

    let can_go_up = last_y > RISE_THRESHOLD_Y;
    let can_go_down = last_y < VIEWPORT_HEIGHT - DROP_MARGIN;
    let max_rise = reach.max_jump_height * MAX_RISE_FRACTION;

    let delta = if rng.random_bool(0.5) && can_go_up {
        let limit_up = max_rise.min(last_y - CEILING_CLEARANCE);
        -(MIN_STEP + rng.random::<f32>() * limit_up)
            .floor()
            .min(max_rise)
    } else if can_go_down {
        (MIN_STEP + rng.random::<f32>() * MAX_DROP_SPREAD).floor()
    } else {
        0.0
    };

    (last_y + delta).clamp(MIN_PLATFORM_Y, VIEWPORT_HEIGHT - FLOOR_CLEARANCE)
}

/// Max gap after the uphill penalty. `rise` is positive when the new top is higher.
pub fn uphill_max_gap(flat_gap: f32, rise: f32, reach: &ReachLimits) -> f32 {
    if rise <= 0.0 {
        return flat_gap;
    }
    let used = (rise / reach.max_jump_height).min(1.0);
    flat_gap * (1.0 - used * UPHILL_PENALTY)
}

fn pick_gap(max_gap: f32, difficulty: f32, rng: &mut impl Rng) -> f32 {
    let min_gap = BASE_MIN_GAP + (difficulty * GAP_PER_DIFFICULTY).min(MAX_GAP_BONUS);
    // Early on the minimum can overtake a steep-rise maximum
    let min_gap = min_gap.min(max_gap - GAP_HEADROOM);

    let gap = if min_gap < max_gap {
        rng.random_range(min_gap..max_gap)
    } else {
        min_gap
    };
    gap.floor().min(max_gap).max(ABSOLUTE_MIN_GAP)
}

fn pick_width(difficulty: f32, rng: &mut impl Rng) -> f32 {
    let narrow = (difficulty * NARROW_PER_DIFFICULTY).min(MAX_NARROW);
    let min_w = (MIN_WIDTH_BASE - narrow).max(MIN_WIDTH_FLOOR);
    let max_w = (MAX_WIDTH_BASE - narrow * 2.0).max(MAX_WIDTH_FLOOR);
    rng.random_range(min_w.ceil() as u32..=max_w.floor() as u32) as f32
}

/// Lay out a coin pattern for `platform`. Arc and Grid place nothing when
/// the gap or platform is too small for them.
pub fn pattern_coins(
    pattern: CoinPattern,
    platform: &Rect,
    previous: &Rect,
    gap: f32,
) -> Vec<CoinSpawn> {
    let coin = |x: f32, y: f32, value: u32| CoinSpawn {
        pos: Vec2::new(x, y),
        value,
    };

    match pattern {
        CoinPattern::Line => {
            let count = ((platform.w / LINE_SPACING).floor() as usize).min(LINE_MAX_COINS);
            (0..count)
                .map(|i| {
                    coin(
                        platform.x + 20.0 + i as f32 * LINE_SPACING,
                        platform.y - COIN_SIZE - 20.0,
                        COIN_VALUE,
                    )
                })
                .collect()
        }
        CoinPattern::Arc if gap > ARC_MIN_GAP => {
            let mid = platform.x - gap / 2.0;
            let peak_y = platform.y.min(previous.y) - ARC_PEAK_LIFT;
            vec![
                coin(mid, peak_y, BONUS_COIN_VALUE),
                coin(mid - 40.0, peak_y + 20.0, COIN_VALUE),
                coin(mid + 40.0, peak_y + 20.0, COIN_VALUE),
            ]
        }
        CoinPattern::Grid if platform.w > GRID_MIN_WIDTH => {
            let mut coins = Vec::with_capacity(4);
            for row in 0..2 {
                for col in 0..2 {
                    coins.push(coin(
                        platform.x + 40.0 + col as f32 * GRID_SPACING,
                        platform.y - 40.0 - row as f32 * GRID_SPACING,
                        COIN_VALUE,
                    ));
                }
            }
            coins
        }
        CoinPattern::Single => vec![coin(
            platform.x + platform.w / 2.0,
            platform.y - COIN_SIZE - 10.0,
            COIN_VALUE,
        )],
        CoinPattern::Arc | CoinPattern::Grid => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn ground() -> Rect {
        initial_platforms(1)[0].rect
    }

    #[test]
    fn test_initial_ground() {
        let platforms = initial_platforms(1);
        assert_eq!(platforms.len(), 1);
        assert_eq!(platforms[0].kind, PlatformKind::Ground);
        assert_eq!(platforms[0].rect, Rect::new(0.0, 500.0, 1200.0, 100.0));
    }

    #[test]
    fn test_same_seed_same_course() {
        let config = GameConfig::default();
        let mut a = Pcg32::seed_from_u64(42);
        let mut b = Pcg32::seed_from_u64(42);
        let mut last_a = ground();
        let mut last_b = ground();
        for i in 0..50 {
            let d = i as f32 * 0.3;
            let sa = generate_next(&last_a, d, 10.0, &config, &mut a);
            let sb = generate_next(&last_b, d, 10.0, &config, &mut b);
            assert_eq!(sa, sb);
            last_a = sa.platform;
            last_b = sb.platform;
        }
    }

    #[test]
    fn test_platforms_advance_and_stay_on_screen() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut last = ground();
        for i in 0..500 {
            let seg = generate_next(&last, i as f32 * 0.05, 12.0, &config, &mut rng);
            assert!(seg.platform.x > last.right());
            assert!(seg.platform.y >= MIN_PLATFORM_Y);
            assert!(seg.platform.y <= VIEWPORT_HEIGHT - FLOOR_CLEARANCE);
            assert_eq!(seg.platform.h, PLATFORM_THICKNESS);
            last = seg.platform;
        }
    }

    #[test]
    fn test_width_narrows_with_difficulty() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(9);
        for _ in 0..200 {
            let easy = generate_next(&ground(), 0.0, 8.0, &config, &mut rng);
            assert!((200.0..=600.0).contains(&easy.platform.w));
            let hard = generate_next(&ground(), 20.0, 8.0, &config, &mut rng);
            assert!((80.0..=300.0).contains(&hard.platform.w));
        }
    }

    #[test]
    fn test_uphill_penalty() {
        let reach = GameConfig::default().reach();
        assert_eq!(uphill_max_gap(300.0, 0.0, &reach), 300.0);
        assert_eq!(uphill_max_gap(300.0, -80.0, &reach), 300.0);
        // Half the apex height costs 35%
        assert!((uphill_max_gap(300.0, 80.0, &reach) - 195.0).abs() < 1e-3);
        // Full height costs 70%, and no more beyond it
        assert!((uphill_max_gap(300.0, 160.0, &reach) - 90.0).abs() < 1e-3);
        assert!((uphill_max_gap(300.0, 400.0, &reach) - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_min_gap_clamped_below_max() {
        // Difficulty 10 wants a 400 minimum; a slow steep rise allows far less
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..100 {
            let gap = pick_gap(120.0, 10.0, &mut rng);
            assert!((ABSOLUTE_MIN_GAP..=120.0).contains(&gap));
        }
    }

    #[test]
    fn test_line_pattern() {
        let platform = Rect::new(1000.0, 400.0, 300.0, PLATFORM_THICKNESS);
        let coins = pattern_coins(CoinPattern::Line, &platform, &ground(), 120.0);
        assert_eq!(coins.len(), 5);
        assert_eq!(coins[0].pos, Vec2::new(1020.0, 350.0));
        assert_eq!(coins[1].pos.x, 1065.0);
        assert!(coins.iter().all(|c| c.value == COIN_VALUE));

        let narrow = Rect::new(1000.0, 400.0, 100.0, PLATFORM_THICKNESS);
        assert_eq!(pattern_coins(CoinPattern::Line, &narrow, &ground(), 120.0).len(), 2);
    }

    #[test]
    fn test_arc_pattern_needs_wide_gap() {
        let previous = Rect::new(0.0, 450.0, 500.0, PLATFORM_THICKNESS);
        let platform = Rect::new(700.0, 400.0, 300.0, PLATFORM_THICKNESS);
        let coins = pattern_coins(CoinPattern::Arc, &platform, &previous, 200.0);
        assert_eq!(coins.len(), 3);
        assert_eq!(coins[0].pos, Vec2::new(600.0, 320.0));
        assert_eq!(coins[0].value, BONUS_COIN_VALUE);
        assert_eq!(coins[1].pos, Vec2::new(560.0, 340.0));
        assert_eq!(coins[2].pos, Vec2::new(640.0, 340.0));
        assert_eq!(coins[1].value, COIN_VALUE);

        assert!(pattern_coins(CoinPattern::Arc, &platform, &previous, 150.0).is_empty());
    }

    #[test]
    fn test_grid_pattern_needs_wide_platform() {
        let platform = Rect::new(700.0, 400.0, 200.0, PLATFORM_THICKNESS);
        let coins = pattern_coins(CoinPattern::Grid, &platform, &ground(), 100.0);
        assert_eq!(coins.len(), 4);
        assert!(coins.contains(&CoinSpawn {
            pos: Vec2::new(780.0, 320.0),
            value: COIN_VALUE
        }));

        let narrow = Rect::new(700.0, 400.0, 150.0, PLATFORM_THICKNESS);
        assert!(pattern_coins(CoinPattern::Grid, &narrow, &ground(), 100.0).is_empty());
    }

    #[test]
    fn test_single_pattern() {
        let platform = Rect::new(700.0, 400.0, 200.0, PLATFORM_THICKNESS);
        let coins = pattern_coins(CoinPattern::Single, &platform, &ground(), 100.0);
        assert_eq!(coins, vec![CoinSpawn {
            pos: Vec2::new(800.0, 360.0),
            value: COIN_VALUE
        }]);
    }

    proptest! {
        #[test]
        fn gap_always_reachable(
            seed in any::<u64>(),
            difficulty in 0.0f32..40.0,
            speed in 8.0f32..=30.0,
            last_y in 150.0f32..=520.0,
            last_w in 80.0f32..=600.0,
        ) {
            let config = GameConfig::default();
            let reach = config.reach();
            let mut rng = Pcg32::seed_from_u64(seed);
            let last = Rect::new(1000.0, last_y, last_w, PLATFORM_THICKNESS);

            let seg = generate_next(&last, difficulty, speed, &config, &mut rng);
            let rise = (last.y - seg.platform.y).max(0.0);
            let allowed = reach.max_flat_gap(speed)
                * (1.0 - (rise / reach.max_jump_height).min(1.0) * UPHILL_PENALTY);

            prop_assert!(seg.gap >= ABSOLUTE_MIN_GAP);
            prop_assert!(seg.gap <= allowed + 1e-3, "gap {} > allowed {}", seg.gap, allowed);
            prop_assert!(rise <= reach.max_jump_height * MAX_RISE_FRACTION + 1e-3);
            prop_assert!((seg.platform.x - last.right() - seg.gap).abs() < 1e-2);
            prop_assert!(seg.coins.iter().all(|c| c.value == COIN_VALUE || c.value == BONUS_COIN_VALUE));
        }
    }
}
