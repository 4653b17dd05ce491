use crate::graph::Node;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great circle distance between two nodes in kilometers (Haversine formula)
pub fn haversine_km(src: &Node, dst: &Node) -> f64 {
    let lat1 = src.lat.to_radians();
    let lat2 = dst.lat.to_radians();
    let lon1 = src.lon.to_radians();
    let lon2 = dst.lon.to_radians();
    let a = (lat2 - lat1) / 2.0;
    let b = (lon2 - lon1) / 2.0;
    let c = a.sin().powi(2) + lat1.cos() * lat2.cos() * b.sin().powi(2);
    let d = 2.0 * c.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * d
}
