use crate::kdtree::{KDTree, KDTreeBuilder};

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct City {
    pub name: &'static str,
    pub lng: f64,
    pub lat: f64,
    pub population: u32,
}

const fn city(name: &'static str, lng: f64, lat: f64, population: u32) -> City {
    City {
        name,
        lng,
        lat,
        population,
    }
}

/// A small excerpt of populated places around Santa Barbara, Kiev and the large cities of
/// eastern Europe.
const CITIES: [City; 35] = [
    city("Mission Canyon", -119.71292, 34.45083, 2381),
    city("Santa Barbara", -119.69819, 34.42083, 88410),
    city("Montecito", -119.63264, 34.43666, 8965),
    city("Summerland", -119.59652, 34.42138, 1448),
    city("Goleta", -119.82764, 34.43583, 30000),
    city("Isla Vista", -119.86097, 34.41333, 23096),
    city("Carpinteria", -119.51846, 34.39888, 13040),
    city("Ventura", -119.29317, 34.27834, 106433),
    city("Kiev", 30.5238, 50.45466, 2797553),
    city("Vyshhorod", 30.4898, 50.58476, 22080),
    city("Kotsyubyns'ke", 30.33256, 50.48823, 13000),
    city("Sofiyivska Borschagivka", 30.37, 50.41, 10000),
    city("Vyshneve", 30.3581, 50.3869, 37000),
    city("Kriukivschina", 30.374, 50.369, 5000),
    city("Irpin'", 30.25055, 50.52175, 40000),
    city("Hostomel'", 30.26508, 50.56871, 15000),
    city("Khotiv", 30.4658, 50.3297, 4000),
    city("Brovary", 30.7903, 50.5114, 100000),
    city("Boryspil", 30.95, 50.35, 60000),
    city("Dnipropetrovsk", 34.98333, 48.45, 1032822),
    city("Kharkiv", 36.25, 50.0, 1430885),
    city("Minsk", 27.56667, 53.9, 1742124),
    city("Odessa", 30.73262, 46.47747, 1001558),
    city("Donets'k", 37.80224, 48.023, 1024700),
    city("Warsaw", 21.01178, 52.22977, 1702139),
    city("Bucharest", 26.10626, 44.43225, 1877155),
    city("Moscow", 37.61556, 55.75222, 10381222),
    city("Rostov-na-Donu", 39.71389, 47.23135, 1074482),
    city("Zaporizhzhya", 35.18333, 47.82289, 796217),
    city("Saint Petersburg", 30.31413, 59.93863, 5028000),
    city("Istanbul", 28.94966, 41.01384, 11174257),
    city("Budapest", 19.03991, 47.49801, 1741041),
    city("Berlin", 13.41053, 52.52437, 3426354),
    city("Lviv", 24.02324, 49.83826, 717803),
    city("Chisinau", 28.8575, 47.00556, 635994),
];

pub(crate) fn cities() -> &'static [City] {
    &CITIES
}

/// Index the cities with a small node size so that searches descend several levels.
pub(crate) fn cities_index(node_size: u16) -> KDTree<f64> {
    let mut builder = KDTreeBuilder::new_with_node_size(CITIES.len() as u32, node_size);
    for c in CITIES.iter() {
        builder.add(c.lng, c.lat);
    }
    builder.finish().unwrap()
}
