// this file contains the coordinate types used to clip the lists to the visible map

use std::str::FromStr;

use serde::Serialize;

use crate::FinderError;

#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// the part of the map currently on screen; whatever the map widget uses decides edge inclusion
pub trait Viewport {
    fn contains(&self, point: LatLng) -> bool;
}

/// south-west / north-east corner box, inclusive on every edge
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Result<Self, FinderError> {
        if south_west.lat > north_east.lat {
            return Err(FinderError::InvalidBounds(format!(
                "south latitude {} is north of {}",
                south_west.lat, north_east.lat
            )));
        }
        Ok(Self {
            south_west,
            north_east,
        })
    }

    fn crosses_antimeridian(&self) -> bool {
        self.south_west.lng > self.north_east.lng
    }
}

impl Viewport for LatLngBounds {
    fn contains(&self, point: LatLng) -> bool {
        let lat_ok = point.lat >= self.south_west.lat && point.lat <= self.north_east.lat;
        let lng_ok = if self.crosses_antimeridian() {
            point.lng >= self.south_west.lng || point.lng <= self.north_east.lng
        } else {
            point.lng >= self.south_west.lng && point.lng <= self.north_east.lng
        };
        lat_ok && lng_ok
    }
}

/// parses `swLat,swLng,neLat,neLng`, the order the map page sends its bounds in
impl FromStr for LatLngBounds {
    type Err = FinderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| FinderError::InvalidBounds(format!("{s}: {e}")))?;
        match parts.as_slice() {
            [sw_lat, sw_lng, ne_lat, ne_lng] => Self::new(
                LatLng {
                    lat: *sw_lat,
                    lng: *sw_lng,
                },
                LatLng {
                    lat: *ne_lat,
                    lng: *ne_lng,
                },
            ),
            _ => Err(FinderError::InvalidBounds(format!(
                "{s}: expected four comma-separated numbers"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_are_inclusive() {
        let bounds: LatLngBounds = "52.0,4.0,53.0,5.0".parse().unwrap();
        assert!(bounds.contains(LatLng { lat: 52.0, lng: 4.0 }));
        assert!(bounds.contains(LatLng { lat: 52.5, lng: 5.0 }));
        assert!(!bounds.contains(LatLng { lat: 53.1, lng: 4.5 }));
        assert!(!bounds.contains(LatLng { lat: 52.5, lng: 3.9 }));
    }

    #[test]
    fn antimeridian_box_wraps() {
        let bounds: LatLngBounds = "-20,170,-10,-170".parse().unwrap();
        assert!(bounds.contains(LatLng { lat: -15.0, lng: 179.0 }));
        assert!(bounds.contains(LatLng { lat: -15.0, lng: -175.0 }));
        assert!(!bounds.contains(LatLng { lat: -15.0, lng: 0.0 }));
    }

    #[test]
    fn rejects_malformed_bounds() {
        assert!("1,2,3".parse::<LatLngBounds>().is_err());
        assert!("a,2,3,4".parse::<LatLngBounds>().is_err());
        assert!("10,0,5,1".parse::<LatLngBounds>().is_err());
    }
}
