use gr_common::db::core::CapacityGrid;
use gr_common::geom::coord::GCell;

/// Per-layer congestion summary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerCongestion {
    pub name: String,
    pub overflow: u64,
    pub overflowed_cells: usize,
    pub max_demand: u32,
}

/// Edge usage counts, one `width * height` plane per layer, laid out the same
/// way as the capacity matrices.
pub struct DemandGrid {
    width: usize,
    height: usize,
    layers: usize,
    demand: Vec<u32>,
}

impl DemandGrid {
    pub fn new(width: usize, height: usize, layers: usize) -> Self {
        Self {
            width,
            height,
            layers,
            demand: vec![0; width * height * layers],
        }
    }

    pub fn for_capacity(cap: &CapacityGrid) -> Self {
        Self::new(cap.x_size, cap.y_size, cap.num_layers())
    }

    #[inline(always)]
    fn index(&self, cell: GCell) -> usize {
        cell.layer * self.width * self.height + cell.row * self.width + cell.col
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn layers(&self) -> usize {
        self.layers
    }

    pub fn add_demand(&mut self, cell: GCell) {
        let idx = self.index(cell);
        self.demand[idx] += 1;
    }

    pub fn demand(&self, cell: GCell) -> u32 {
        self.demand[self.index(cell)]
    }

    fn plane(&self, layer: usize) -> &[u32] {
        let size = self.width * self.height;
        &self.demand[layer * size..(layer + 1) * size]
    }

    /// Sum over every cell of `max(demand - capacity, 0)`.
    pub fn total_overflow(&self, cap: &CapacityGrid) -> u64 {
        self.layer_congestion(cap).iter().map(|l| l.overflow).sum()
    }

    pub fn layer_congestion(&self, cap: &CapacityGrid) -> Vec<LayerCongestion> {
        cap.layers
            .iter()
            .enumerate()
            .take(self.layers)
            .map(|(layer, data)| {
                let plane = self.plane(layer);
                let mut overflow = 0u64;
                let mut overflowed_cells = 0;
                for (&used, &capacity) in plane.iter().zip(&data.capacities) {
                    if used > capacity {
                        overflow += (used - capacity) as u64;
                        overflowed_cells += 1;
                    }
                }
                LayerCongestion {
                    name: data.name.clone(),
                    overflow,
                    overflowed_cells,
                    max_demand: plane.iter().copied().max().unwrap_or(0),
                }
            })
            .collect()
    }
}
