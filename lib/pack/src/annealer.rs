use crate::{AlphaMask, ImageRef, Layout, PlacedItem};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Tuning knobs for one annealing run. All randomness flows from `seed`, so a
/// config fully determines the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnealerConfig {
    /// Starting temperature.
    pub initial_temperature: f64,
    /// Geometric decay per step: `t *= 1 - cooling_rate`.
    pub cooling_rate: f64,
    /// Terminal temperature; at or below this the annealer is converged.
    pub temperature_floor: f64,
    /// Jitter move magnitude J: offsets are drawn from [-J/2, +J/2).
    pub jitter: f64,
    pub seed: u64,
}

impl Default for AnnealerConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 100.0,
            cooling_rate: 0.01,
            temperature_floor: 1.0,
            jitter: 40.0,
            seed: 0,
        }
    }
}

/// Annealing lifecycle. `Converged` is terminal: further steps are no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Annealing,
    Converged,
}

/// Count of intersecting silhouette pairs across the layout, each hull
/// translated to canvas coordinates first. Zero means no detected overlap.
#[must_use]
pub fn energy(layout: &Layout) -> usize {
    let hulls: Vec<_> = layout.items().iter().map(PlacedItem::canvas_hull).collect();
    let mut count = 0;
    for i in 0..hulls.len() {
        for j in (i + 1)..hulls.len() {
            if hulls[i].intersects(&hulls[j]) {
                count += 1;
            }
        }
    }
    count
}

/// Metropolis acceptance criterion: strict improvements are always taken,
/// otherwise `exp((current - proposed) / temperature)`. Equal energies yield
/// exactly 1.0.
#[must_use]
pub fn acceptance_probability(current: usize, proposed: usize, temperature: f64) -> f64 {
    if proposed < current {
        return 1.0;
    }
    ((current as f64 - proposed as f64) / temperature).exp()
}

/// Simulated-annealing packer. Owns the layout, the schedule state, and its
/// own seeded RNG, so independent instances never interfere and a seed
/// reproduces a run exactly.
///
/// `step()` is one discrete transition; callers drive it from their own loop
/// and may interleave rendering or stop at any point. The layout and energy
/// are self-consistent after every completed step.
#[derive(Clone)]
pub struct Annealer {
    config: AnnealerConfig,
    canvas_width: f64,
    canvas_height: f64,
    layout: Layout,
    energy: usize,
    temperature: f64,
    iterations: u64,
    phase: Phase,
    rng: Pcg32,
}

impl Annealer {
    /// Extract each image's hull once, scatter the images uniformly at random
    /// with their full bounding boxes inside the canvas (rotation 0), and
    /// score the initial layout.
    #[must_use]
    pub fn new(
        config: AnnealerConfig,
        canvas_width: f64,
        canvas_height: f64,
        images: Vec<(ImageRef, AlphaMask)>,
    ) -> Self {
        let mut rng = Pcg32::seed_from_u64(config.seed);
        let mut layout = Layout::new();
        for (image, mask) in images {
            let span_x = (canvas_width - f64::from(mask.width)).max(0.0);
            let span_y = (canvas_height - f64::from(mask.height)).max(0.0);
            layout.push(PlacedItem {
                hull: mask.hull(),
                width: mask.width,
                height: mask.height,
                image,
                x: rng.random::<f64>() * span_x,
                y: rng.random::<f64>() * span_y,
                rotation_deg: 0.0,
            });
        }

        let energy = energy(&layout);
        let temperature = config.initial_temperature;
        let phase = if temperature <= config.temperature_floor {
            Phase::Converged
        } else {
            Phase::Annealing
        };
        debug!(items = layout.len(), energy, "annealer initialized");

        Self {
            config,
            canvas_width,
            canvas_height,
            layout,
            energy,
            temperature,
            iterations: 0,
            phase,
            rng,
        }
    }

    /// One annealing transition: propose a neighbor, apply the Metropolis
    /// accept/reject draw, cool the temperature, and check the floor.
    ///
    /// No-op once converged.
    pub fn step(&mut self) {
        if self.phase == Phase::Converged {
            return;
        }

        let candidate = self.propose_neighbor();
        let candidate_energy = energy(&candidate);
        let p = acceptance_probability(self.energy, candidate_energy, self.temperature);
        if self.rng.random::<f64>() < p {
            trace!(
                iteration = self.iterations,
                from = self.energy,
                to = candidate_energy,
                "move accepted"
            );
            self.layout = candidate;
            self.energy = candidate_energy;
        }

        self.temperature *= 1.0 - self.config.cooling_rate;
        self.iterations += 1;
        if self.temperature <= self.config.temperature_floor {
            self.phase = Phase::Converged;
            debug!(
                iterations = self.iterations,
                energy = self.energy,
                "annealer converged"
            );
        }
    }

    /// Convenience loop over [`Annealer::step`] for tests and offline use.
    /// Interactive callers should drive `step()` themselves, one call per
    /// scheduling quantum.
    pub fn run_to_convergence(&mut self) {
        while self.phase != Phase::Converged {
            self.step();
        }
    }

    /// Neighbor proposal: uniformly one of jitter, swap, rotate. Exactly one
    /// item (one pair for swap) changes; the rest of the layout is copied
    /// unchanged. Swap falls back to jitter when there are fewer than two
    /// items.
    fn propose_neighbor(&mut self) -> Layout {
        let mut candidate = self.layout.clone();
        if candidate.is_empty() {
            return candidate;
        }

        let mut kind = self.rng.random_range(0..3u8);
        if kind == 1 && candidate.len() < 2 {
            kind = 0;
        }
        match kind {
            0 => {
                let idx = self.rng.random_range(0..candidate.len());
                let dx = (self.rng.random::<f64>() - 0.5) * self.config.jitter;
                let dy = (self.rng.random::<f64>() - 0.5) * self.config.jitter;
                let item = &mut candidate.items_mut()[idx];
                item.x += dx;
                item.y += dy;
            }
            1 => {
                let a = self.rng.random_range(0..candidate.len());
                let mut b = self.rng.random_range(0..candidate.len() - 1);
                if b >= a {
                    b += 1;
                }
                let items = candidate.items_mut();
                let (ax, ay) = (items[a].x, items[a].y);
                let (bx, by) = (items[b].x, items[b].y);
                items[a].x = bx;
                items[a].y = by;
                items[b].x = ax;
                items[b].y = ay;
            }
            _ => {
                let idx = self.rng.random_range(0..candidate.len());
                let spin = self.rng.random::<f64>() * 360.0;
                candidate.items_mut()[idx].rotation_deg += spin;
            }
        }
        candidate
    }

    #[inline]
    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Hand the final layout to the caller (renderer, manual adjustment).
    #[must_use]
    pub fn into_layout(self) -> Layout {
        self.layout
    }

    #[inline]
    #[must_use]
    pub fn energy(&self) -> usize {
        self.energy
    }

    #[inline]
    #[must_use]
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    #[inline]
    #[must_use]
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    #[inline]
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.phase == Phase::Converged
    }

    #[inline]
    #[must_use]
    pub fn canvas_size(&self) -> (f64, f64) {
        (self.canvas_width, self.canvas_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_images(n: usize, size: u32) -> Vec<(ImageRef, AlphaMask)> {
        (0..n)
            .map(|i| {
                (
                    ImageRef::new(format!("img{}", i)),
                    AlphaMask::opaque(size, size),
                )
            })
            .collect()
    }

    #[test]
    fn test_acceptance_probability() {
        // Strict improvement is always taken.
        assert_eq!(acceptance_probability(5, 3, 10.0), 1.0);
        // Equal energies pass through the exponential and yield exactly 1.0.
        assert_eq!(acceptance_probability(4, 4, 10.0), 1.0);
        // Worse proposals land in (0, 1), shrinking with temperature.
        let warm = acceptance_probability(3, 5, 10.0);
        let cold = acceptance_probability(3, 5, 1.0);
        assert!(warm > 0.0 && warm < 1.0);
        assert!(cold < warm);
    }

    #[test]
    fn test_empty_layout_has_zero_energy_and_converges() {
        let mut annealer = Annealer::new(AnnealerConfig::default(), 100.0, 100.0, Vec::new());
        assert_eq!(annealer.energy(), 0);
        annealer.run_to_convergence();
        assert!(annealer.is_converged());
        assert_eq!(annealer.energy(), 0);
    }

    #[test]
    fn test_initial_placement_fits_canvas() {
        let annealer = Annealer::new(
            AnnealerConfig::default(),
            100.0,
            100.0,
            square_images(8, 20),
        );
        for item in annealer.layout().items() {
            assert!(item.x >= 0.0 && item.x <= 80.0);
            assert!(item.y >= 0.0 && item.y <= 80.0);
            assert_eq!(item.rotation_deg, 0.0);
        }
    }

    #[test]
    fn test_oversized_image_clamps_to_origin() {
        let annealer = Annealer::new(
            AnnealerConfig::default(),
            10.0,
            10.0,
            square_images(1, 50),
        );
        let item = &annealer.layout().items()[0];
        assert_eq!((item.x, item.y), (0.0, 0.0));
    }

    #[test]
    fn test_steps_are_deterministic_per_seed() {
        let config = AnnealerConfig {
            seed: 42,
            ..AnnealerConfig::default()
        };
        let mut a = Annealer::new(config.clone(), 200.0, 200.0, square_images(5, 30));
        let mut b = Annealer::new(config, 200.0, 200.0, square_images(5, 30));
        for _ in 0..50 {
            a.step();
            b.step();
            assert_eq!(a.layout(), b.layout());
            assert_eq!(a.energy(), b.energy());
        }
    }

    #[test]
    fn test_temperature_decays_to_floor() {
        let config = AnnealerConfig {
            initial_temperature: 10.0,
            cooling_rate: 0.5,
            ..AnnealerConfig::default()
        };
        let mut annealer = Annealer::new(config, 100.0, 100.0, square_images(2, 10));
        let t0 = annealer.temperature();
        annealer.step();
        assert!(annealer.temperature() < t0);
        annealer.run_to_convergence();
        assert!(annealer.temperature() <= 1.0);
        assert!(annealer.is_converged());

        // Terminal: further steps change nothing.
        let frozen = annealer.layout().clone();
        let iterations = annealer.iterations();
        annealer.step();
        assert_eq!(annealer.layout(), &frozen);
        assert_eq!(annealer.iterations(), iterations);
    }

    #[test]
    fn test_proposal_perturbs_exactly_one_item_or_pair() {
        let config = AnnealerConfig {
            seed: 9,
            ..AnnealerConfig::default()
        };
        let mut annealer = Annealer::new(config, 500.0, 500.0, square_images(6, 20));
        for _ in 0..100 {
            let before = annealer.layout().clone();
            let after = annealer.propose_neighbor();
            let changed = before
                .items()
                .iter()
                .zip(after.items())
                .filter(|(a, b)| a != b)
                .count();
            assert!(changed == 1 || changed == 2, "changed {} items", changed);
        }
    }
}
