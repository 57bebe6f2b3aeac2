use collage_geom::Hull;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Opaque handle to an externally owned image resource (content hash, path).
/// The packer never inspects it; it only travels with the placement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ImageRef {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Per-pixel opacity of one image, row-major, one byte per pixel.
/// This is the image store's entire contract with the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlphaMask {
    pub width: u32,
    pub height: u32,
    pub alpha: Vec<u8>,
}

impl AlphaMask {
    #[must_use]
    pub fn new(width: u32, height: u32, alpha: Vec<u8>) -> Self {
        Self {
            width,
            height,
            alpha,
        }
    }

    /// A fully opaque mask, handy for tests and rectangular images.
    #[must_use]
    pub fn opaque(width: u32, height: u32) -> Self {
        Self::new(width, height, vec![255; (width * height) as usize])
    }

    /// Convex hull of the opacity-positive pixels, in image-local coordinates.
    #[must_use]
    pub fn hull(&self) -> Hull {
        Hull::from_alpha_mask(self.width, self.height, &self.alpha)
    }
}

/// One image placed on the canvas: its silhouette hull (image-local), the
/// top-left offset, and a rotation in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedItem {
    pub image: ImageRef,
    pub width: u32,
    pub height: u32,
    pub hull: Hull,
    pub x: f64,
    pub y: f64,
    pub rotation_deg: f64,
}

impl PlacedItem {
    /// Silhouette hull translated to canvas coordinates.
    #[must_use]
    pub fn canvas_hull(&self) -> Hull {
        self.hull.translate(self.x, self.y)
    }

    /// Axis-aligned bounding-box hit test in canvas coordinates.
    #[must_use]
    pub fn bounds_contain(&self, px: f64, py: f64) -> bool {
        px >= self.x
            && py >= self.y
            && px <= self.x + f64::from(self.width)
            && py <= self.y + f64::from(self.height)
    }

    /// Manual position adjustment (drag).
    pub fn nudge(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Manual rotation adjustment (e.g. 15-degree wheel increments).
    pub fn rotate_by(&mut self, degrees: f64) {
        self.rotation_deg += degrees;
    }
}

/// Ordered placement list. Insertion order is the z-order: later items render
/// on top and win hit tests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    items: Vec<PlacedItem>,
}

impl Layout {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn items(&self) -> &[PlacedItem] {
        &self.items
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, item: PlacedItem) {
        self.items.push(item);
    }

    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&PlacedItem> {
        self.items.get(index)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut PlacedItem> {
        self.items.get_mut(index)
    }

    #[inline]
    pub fn items_mut(&mut self) -> &mut [PlacedItem] {
        &mut self.items
    }

    /// Index of the topmost item whose bounding box contains (px, py).
    #[must_use]
    pub fn item_at(&self, px: f64, py: f64) -> Option<usize> {
        self.items
            .iter()
            .enumerate()
            .rev()
            .find(|(_, item)| item.bounds_contain(px, py))
            .map(|(i, _)| i)
    }
}

/// Pick `n` elements from `items` without replacement (partial Fisher-Yates).
/// Used to choose which images participate in a packing session.
#[must_use]
pub fn choose_random_subset<T: Clone, R: Rng>(items: &[T], n: usize, rng: &mut R) -> Vec<T> {
    let mut pool: Vec<T> = items.to_vec();
    let n = n.min(pool.len());
    let mut result = Vec::with_capacity(n);
    let mut len = pool.len();
    for _ in 0..n {
        let idx = rng.random_range(0..len);
        result.push(pool[idx].clone());
        pool.swap(idx, len - 1);
        len -= 1;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn item(id: &str, x: f64, y: f64, size: u32) -> PlacedItem {
        PlacedItem {
            image: ImageRef::new(id),
            width: size,
            height: size,
            hull: AlphaMask::opaque(size, size).hull(),
            x,
            y,
            rotation_deg: 0.0,
        }
    }

    #[test]
    fn test_item_at_prefers_topmost() {
        let mut layout = Layout::new();
        layout.push(item("below", 0.0, 0.0, 20));
        layout.push(item("above", 10.0, 10.0, 20));

        // Overlap region: the later item wins.
        assert_eq!(layout.item_at(15.0, 15.0), Some(1));
        // Only the first item covers the origin.
        assert_eq!(layout.item_at(1.0, 1.0), Some(0));
        assert_eq!(layout.item_at(100.0, 100.0), None);
    }

    #[test]
    fn test_drag_flow_nudges_the_hit_item() {
        // Hit test then adjust, the way an interactive caller drags an item.
        let mut layout = Layout::new();
        layout.push(item("a", 5.0, 5.0, 10));
        layout.push(item("b", 50.0, 50.0, 10));

        let grabbed = layout.item_at(8.0, 8.0).unwrap();
        let placed = layout.get_mut(grabbed).unwrap();
        placed.nudge(2.0, -1.0);
        placed.rotate_by(15.0);

        let placed = layout.get(grabbed).unwrap();
        assert_eq!((placed.x, placed.y), (7.0, 4.0));
        assert_eq!(placed.rotation_deg, 15.0);
        assert_eq!(layout.get(1).map(|p| p.x), Some(50.0));
    }

    #[test]
    fn test_canvas_hull_is_translated() {
        let placed = item("a", 100.0, 200.0, 10);
        let hull = placed.canvas_hull();
        assert!(hull.contains(collage_geom::Point::new(105.0, 205.0)));
    }

    #[test]
    fn test_choose_random_subset() {
        let mut rng = Pcg32::seed_from_u64(7);
        let items: Vec<u32> = (0..100).collect();
        let picked = choose_random_subset(&items, 10, &mut rng);
        assert_eq!(picked.len(), 10);
        // Without replacement: all distinct.
        let mut sorted = picked.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 10);

        // Oversized request caps at the pool size.
        assert_eq!(choose_random_subset(&items, 1000, &mut rng).len(), 100);
    }
}
