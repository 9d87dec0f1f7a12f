use crate::db::indices::{LayerId, NetId};
use crate::geom::coord::{GCell, GridCoord};
use std::collections::HashMap;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerDirection {
    Horizontal,
    Vertical,
}

impl LayerDirection {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "H" => Some(Self::Horizontal),
            "V" => Some(Self::Vertical),
            _ => None,
        }
    }
}

impl fmt::Display for LayerDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Horizontal => f.write_str("H"),
            Self::Vertical => f.write_str("V"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct LayerData {
    pub name: String,
    pub index: LayerId,
    pub direction: LayerDirection,
    /// Row-major `y_size * x_size` capacities of the edge leaving each cell
    /// in the layer's preferred direction.
    pub capacities: Vec<u32>,
}

/// Contents of a `.cap` file.
#[derive(Clone, Debug)]
pub struct CapacityGrid {
    pub x_size: usize,
    pub y_size: usize,
    pub unit_via_cost: u64,
    /// `x_size - 1` entries; entry `x` is the length between column `x` and `x + 1`.
    pub horizontal_edge_lengths: Vec<u64>,
    /// `y_size - 1` entries; entry `y` is the length between row `y` and `y + 1`.
    pub vertical_edge_lengths: Vec<u64>,
    pub layers: Vec<LayerData>,
}

impl CapacityGrid {
    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    pub fn num_cells(&self) -> usize {
        self.x_size * self.y_size
    }

    pub fn layer(&self, z: i32) -> Option<&LayerData> {
        usize::try_from(z).ok().and_then(|z| self.layers.get(z))
    }

    pub fn contains_x(&self, x: i32) -> bool {
        usize::try_from(x).is_ok_and(|x| x < self.x_size)
    }

    pub fn contains_y(&self, y: i32) -> bool {
        usize::try_from(y).is_ok_and(|y| y < self.y_size)
    }

    pub fn contains_layer(&self, z: i32) -> bool {
        self.layer(z).is_some()
    }

    /// Returns the cell at `(z, x, y)` if every coordinate is on the grid.
    pub fn gcell(&self, z: i32, x: i32, y: i32) -> Option<GCell> {
        if self.contains_layer(z) && self.contains_x(x) && self.contains_y(y) {
            Some(GCell::new(z as usize, y as usize, x as usize))
        } else {
            None
        }
    }

    #[inline]
    pub fn capacity(&self, cell: GCell) -> u32 {
        self.layers[cell.layer].capacities[cell.row * self.x_size + cell.col]
    }

    pub fn horizontal_length(&self, x: i32) -> Option<u64> {
        usize::try_from(x)
            .ok()
            .and_then(|x| self.horizontal_edge_lengths.get(x).copied())
    }

    pub fn vertical_length(&self, y: i32) -> Option<u64> {
        usize::try_from(y)
            .ok()
            .and_then(|y| self.vertical_edge_lengths.get(y).copied())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetData {
    pub name: String,
    pub pins: Vec<GridCoord>,
}

impl NetData {
    /// First and last declared pin. `None` for nets with fewer than two pins.
    pub fn terminals(&self) -> Option<(GridCoord, GridCoord)> {
        match self.pins.as_slice() {
            [first, .., last] => Some((*first, *last)),
            _ => None,
        }
    }
}

/// Contents of a `.net` file, in declaration order.
#[derive(Clone, Debug, Default)]
pub struct NetList {
    pub nets: Vec<NetData>,
    pub net_name_map: HashMap<String, NetId>,
}

impl NetList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_nets(&self) -> usize {
        self.nets.len()
    }

    /// Adds a net. A repeated name replaces the earlier definition but keeps
    /// its position.
    pub fn add_net(&mut self, name: String, pins: Vec<GridCoord>) -> NetId {
        if let Some(&id) = self.net_name_map.get(&name) {
            log::warn!("Net '{}' is declared more than once; keeping the last definition", name);
            self.nets[id.index()].pins = pins;
            return id;
        }
        let id = NetId::new(self.nets.len());
        self.nets.push(NetData {
            name: name.clone(),
            pins,
        });
        self.net_name_map.insert(name, id);
        id
    }

    pub fn get(&self, name: &str) -> Option<&NetData> {
        self.net_name_map.get(name).map(|id| &self.nets[id.index()])
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment {
    pub start: GridCoord,
    pub end: GridCoord,
}

impl Segment {
    pub fn new(start: GridCoord, end: GridCoord) -> Self {
        Self { start, end }
    }

    pub fn is_via(&self) -> bool {
        self.start.z != self.end.z
    }

    pub fn touches(&self, point: GridCoord) -> bool {
        self.start == point || self.end == point
    }

    pub fn shares_endpoint(&self, other: &Segment) -> bool {
        other.touches(self.start) || other.touches(self.end)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordDefect {
    WrongArity(usize),
    NonInteger(String),
}

/// A route body line that could not be read as six integers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MalformedRecord {
    pub line: usize,
    pub tokens: Vec<String>,
    pub defect: RecordDefect,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteRecord {
    Segment(Segment),
    Malformed(MalformedRecord),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoutedNet {
    pub name: String,
    pub records: Vec<RouteRecord>,
}

impl RoutedNet {
    /// Well-formed segments in file order; malformed lines are skipped.
    pub fn segments(&self) -> impl Iterator<Item = &Segment> + '_ {
        self.numbered_segments().map(|(_, seg)| seg)
    }

    /// Well-formed segments paired with their record position in the block,
    /// so numbering matches reports that also count malformed lines.
    pub fn numbered_segments(&self) -> impl Iterator<Item = (usize, &Segment)> + '_ {
        self.records
            .iter()
            .enumerate()
            .filter_map(|(index, record)| match record {
                RouteRecord::Segment(seg) => Some((index, seg)),
                RouteRecord::Malformed(_) => None,
            })
    }

    pub fn num_segments(&self) -> usize {
        self.segments().count()
    }
}

/// Contents of a `.route` file, one entry per block in file order.
#[derive(Clone, Debug, Default)]
pub struct RouteSolution {
    pub nets: Vec<RoutedNet>,
}

impl RouteSolution {
    pub fn total_segments(&self) -> usize {
        self.nets.iter().map(RoutedNet::num_segments).sum()
    }

    /// Name lookup; when a name is routed twice the later block wins.
    pub fn by_name(&self) -> HashMap<&str, &RoutedNet> {
        self.nets.iter().map(|net| (net.name.as_str(), net)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_2x3() -> CapacityGrid {
        CapacityGrid {
            x_size: 2,
            y_size: 3,
            unit_via_cost: 4,
            horizontal_edge_lengths: vec![7],
            vertical_edge_lengths: vec![2, 3],
            layers: vec![LayerData {
                name: "M1".to_string(),
                index: LayerId::new(0),
                direction: LayerDirection::Horizontal,
                capacities: vec![1, 2, 3, 4, 5, 6],
            }],
        }
    }

    #[test]
    fn gcell_rejects_out_of_range_coordinates() {
        let grid = grid_2x3();
        assert_eq!(grid.gcell(0, 1, 2), Some(GCell::new(0, 2, 1)));
        assert_eq!(grid.gcell(0, 2, 0), None);
        assert_eq!(grid.gcell(0, -1, 0), None);
        assert_eq!(grid.gcell(1, 0, 0), None);
    }

    #[test]
    fn capacity_is_row_major() {
        let grid = grid_2x3();
        assert_eq!(grid.capacity(GCell::new(0, 0, 1)), 2);
        assert_eq!(grid.capacity(GCell::new(0, 2, 0)), 5);
    }

    #[test]
    fn edge_lengths_out_of_table_are_none() {
        let grid = grid_2x3();
        assert_eq!(grid.horizontal_length(0), Some(7));
        assert_eq!(grid.horizontal_length(1), None);
        assert_eq!(grid.vertical_length(1), Some(3));
        assert_eq!(grid.vertical_length(-1), None);
    }

    #[test]
    fn terminals_are_first_and_last_pin() {
        let net = NetData {
            name: "n".to_string(),
            pins: vec![
                GridCoord::new(0, 0, 0),
                GridCoord::new(1, 0, 0),
                GridCoord::new(2, 2, 1),
            ],
        };
        assert_eq!(
            net.terminals(),
            Some((GridCoord::new(0, 0, 0), GridCoord::new(2, 2, 1)))
        );
        let single = NetData {
            name: "s".to_string(),
            pins: vec![GridCoord::new(0, 0, 0)],
        };
        assert_eq!(single.terminals(), None);
    }

    #[test]
    fn duplicate_net_replaces_in_place() {
        let mut nets = NetList::new();
        let a = nets.add_net("a".to_string(), vec![GridCoord::new(0, 0, 0)]);
        nets.add_net("b".to_string(), Vec::new());
        let again = nets.add_net("a".to_string(), vec![GridCoord::new(1, 1, 1)]);
        assert_eq!(a, again);
        assert_eq!(nets.num_nets(), 2);
        assert_eq!(nets.nets[0].pins, vec![GridCoord::new(1, 1, 1)]);
    }

    #[test]
    fn later_route_block_wins_lookup() {
        let seg = Segment::new(GridCoord::new(0, 0, 0), GridCoord::new(1, 0, 0));
        let routes = RouteSolution {
            nets: vec![
                RoutedNet {
                    name: "a".to_string(),
                    records: Vec::new(),
                },
                RoutedNet {
                    name: "a".to_string(),
                    records: vec![RouteRecord::Segment(seg)],
                },
            ],
        };
        assert_eq!(routes.by_name()["a"].num_segments(), 1);
        assert_eq!(routes.total_segments(), 1);
    }

    #[test]
    fn numbered_segments_keep_record_positions() {
        let seg = |x| Segment::new(GridCoord::new(x, 0, 0), GridCoord::new(x + 1, 0, 0));
        let net = RoutedNet {
            name: "a".to_string(),
            records: vec![
                RouteRecord::Segment(seg(0)),
                RouteRecord::Malformed(MalformedRecord {
                    line: 4,
                    tokens: vec!["1".to_string()],
                    defect: RecordDefect::WrongArity(1),
                }),
                RouteRecord::Segment(seg(1)),
            ],
        };
        let numbered: Vec<_> = net.numbered_segments().map(|(i, s)| (i, *s)).collect();
        assert_eq!(numbered, vec![(0, seg(0)), (2, seg(1))]);
        assert_eq!(net.num_segments(), 2);
    }
}
