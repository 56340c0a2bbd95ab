//! Spatial structures: R-tree hit testing and Voronoi hit regions.
//!
//! The R-tree answers "which node's cell contains this pointer" directly;
//! the tessellator materializes the cell polygons themselves so the
//! renderer can layer generous hit regions over the drawing.

mod rtree;
mod voronoi;

pub use rtree::{SitePoint, SpatialIndex};
pub use voronoi::{Extent, VoronoiTessellator};
