use crate::core::load_components::table::LoadComponentRow;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub enum SurfaceClass {
    Wall,
    Floor,
    Roof,
    Window,
    Door,
}

/// What lies on the outside face of a surface.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum OutsideBoundary {
    ExternalEnvironment,
    Ground,
    GroundFCfactorMethod,
    KivaFoundation,
    /// `ground_preprocessor` marks coefficient sets generated from ground temperature
    /// preprocessing, which are reported as ground contact.
    OtherSideCoefficients {
        #[serde(default)]
        ground_preprocessor: bool,
    },
    OtherSideConditionsModel,
    Interzone {
        adjacent_surface: String,
    },
    Adiabatic,
}

/// Boundary grouping used when bucketing surfaces into report rows
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BoundaryGroup {
    Exterior,
    GroundContact,
    OtherSide,
    Interzone,
}

impl OutsideBoundary {
    fn group(&self) -> BoundaryGroup {
        match self {
            OutsideBoundary::ExternalEnvironment => BoundaryGroup::Exterior,
            OutsideBoundary::Ground
            | OutsideBoundary::GroundFCfactorMethod
            | OutsideBoundary::KivaFoundation
            | OutsideBoundary::OtherSideCoefficients {
                ground_preprocessor: true,
            } => BoundaryGroup::GroundContact,
            OutsideBoundary::OtherSideCoefficients {
                ground_preprocessor: false,
            }
            | OutsideBoundary::OtherSideConditionsModel => BoundaryGroup::OtherSide,
            OutsideBoundary::Interzone { .. } | OutsideBoundary::Adiabatic => {
                BoundaryGroup::Interzone
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Surface {
    pub name: String,
    pub zone: usize,
    pub class: SurfaceClass,
    pub outside_boundary: OutsideBoundary,
    /// gross area, including any subsurfaces, in m2
    pub gross_area: f64,
    /// net heat transfer area, in m2
    pub area: f64,
    pub heat_transfer: bool,
}

impl Surface {
    pub fn is_window(&self) -> bool {
        self.class == SurfaceClass::Window
    }

    /// The report row collecting this surface's delayed (opaque) heat, if any.
    /// Windows are reported through the fenestration rows instead.
    pub fn opaque_row(&self) -> Option<LoadComponentRow> {
        use BoundaryGroup as Group;
        use LoadComponentRow as Row;

        let group = self.outside_boundary.group();
        match self.class {
            SurfaceClass::Wall => Some(match group {
                Group::Exterior => Row::ExteriorWall,
                Group::GroundContact => Row::GroundContactWall,
                Group::OtherSide => Row::OtherWall,
                Group::Interzone => Row::InterzoneWall,
            }),
            SurfaceClass::Floor => Some(match group {
                Group::Exterior => Row::ExteriorFloor,
                Group::GroundContact => Row::GroundContactFloor,
                Group::OtherSide => Row::OtherFloor,
                Group::Interzone => Row::InterzoneFloor,
            }),
            SurfaceClass::Roof => Some(match group {
                Group::Exterior => Row::Roof,
                Group::GroundContact | Group::OtherSide => Row::OtherRoof,
                Group::Interzone => Row::InterzoneCeiling,
            }),
            SurfaceClass::Door => Some(Row::OpaqueDoor),
            SurfaceClass::Window => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Zone {
    pub name: String,
    /// in m2
    pub floor_area: f64,
    pub multiplier: f64,
    pub list_multiplier: f64,
    /// whether the zone is served by zone HVAC equipment
    pub is_controlled: bool,
    pub radiant_enclosure: usize,
}

impl Zone {
    /// Combined zone and zone list multiplier; a zero multiplier counts as one
    pub fn effective_multiplier(&self) -> f64 {
        let multiplier = self.multiplier * self.list_multiplier;
        if multiplier == 0. {
            1.
        } else {
            multiplier
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct People {
    pub name: String,
    pub zone: usize,
    pub number_of_people: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AirLoop {
    pub name: String,
    pub zones_cooled: Vec<usize>,
    pub zones_heated: Vec<usize>,
}

impl AirLoop {
    /// Sorted union of cooled and heated zones, without duplicates
    pub fn zones_served(&self) -> Vec<usize> {
        let mut zones: Vec<usize> = self
            .zones_cooled
            .iter()
            .chain(self.zones_heated.iter())
            .copied()
            .collect();
        zones.sort_unstable();
        zones.dedup();
        zones
    }
}

/// Surface areas of a zone grouped the same way as the report rows, in m2
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ZoneComponentAreas {
    pub floor_area: f64,
    pub roof: f64,
    pub interzone_ceiling: f64,
    pub other_roof: f64,
    pub exterior_wall: f64,
    pub interzone_wall: f64,
    pub ground_contact_wall: f64,
    pub other_wall: f64,
    pub exterior_floor: f64,
    pub interzone_floor: f64,
    pub ground_contact_floor: f64,
    pub other_floor: f64,
    pub fenestration: f64,
    pub door: f64,
}

impl ZoneComponentAreas {
    /// Related area for a report row; rows with no associated area give None
    pub fn area_for(&self, row: LoadComponentRow) -> Option<f64> {
        use LoadComponentRow as Row;

        match row {
            Row::People
            | Row::Lights
            | Row::Equipment
            | Row::Refrigeration
            | Row::WaterUse
            | Row::HvacLoss
            | Row::PowerGeneration
            | Row::Doas
            | Row::Infiltration
            | Row::ZoneVentilation
            | Row::InterzoneMixing => Some(self.floor_area),
            Row::Roof => Some(self.roof),
            Row::InterzoneCeiling => Some(self.interzone_ceiling),
            Row::OtherRoof => Some(self.other_roof),
            Row::ExteriorWall => Some(self.exterior_wall),
            Row::InterzoneWall => Some(self.interzone_wall),
            Row::GroundContactWall => Some(self.ground_contact_wall),
            Row::OtherWall => Some(self.other_wall),
            Row::ExteriorFloor => Some(self.exterior_floor),
            Row::InterzoneFloor => Some(self.interzone_floor),
            Row::GroundContactFloor => Some(self.ground_contact_floor),
            Row::OtherFloor => Some(self.other_floor),
            Row::FenestrationConduction | Row::FenestrationSolar => Some(self.fenestration),
            Row::OpaqueDoor => Some(self.door),
            Row::GrandTotal => None,
        }
    }

    fn add_surface(&mut self, surface: &Surface) {
        use LoadComponentRow as Row;

        let area = surface.gross_area;
        let bucket = match surface.opaque_row() {
            None => &mut self.fenestration,
            Some(Row::Roof) => &mut self.roof,
            Some(Row::InterzoneCeiling) => &mut self.interzone_ceiling,
            Some(Row::OtherRoof) => &mut self.other_roof,
            Some(Row::ExteriorWall) => &mut self.exterior_wall,
            Some(Row::InterzoneWall) => &mut self.interzone_wall,
            Some(Row::GroundContactWall) => &mut self.ground_contact_wall,
            Some(Row::OtherWall) => &mut self.other_wall,
            Some(Row::ExteriorFloor) => &mut self.exterior_floor,
            Some(Row::InterzoneFloor) => &mut self.interzone_floor,
            Some(Row::GroundContactFloor) => &mut self.ground_contact_floor,
            Some(Row::OtherFloor) => &mut self.other_floor,
            Some(_) => &mut self.door,
        };
        *bucket += area;
    }
}

/// The parts of the building model the load component report needs, with all cross references
/// resolved to indices.
#[derive(Clone, Debug, Default)]
pub struct Building {
    zones: Vec<Zone>,
    surfaces: Vec<Surface>,
    people: Vec<People>,
    air_loops: Vec<AirLoop>,
    number_of_enclosures: usize,
    surfaces_by_zone: Vec<Vec<usize>>,
}

impl Building {
    pub fn new(
        zones: Vec<Zone>,
        surfaces: Vec<Surface>,
        people: Vec<People>,
        air_loops: Vec<AirLoop>,
    ) -> Self {
        let mut surfaces_by_zone = vec![vec![]; zones.len()];
        for (surface_idx, surface) in surfaces.iter().enumerate() {
            if surface.heat_transfer {
                surfaces_by_zone[surface.zone].push(surface_idx);
            }
        }
        let number_of_enclosures = zones
            .iter()
            .map(|zone| zone.radiant_enclosure + 1)
            .max()
            .unwrap_or(0);

        Self {
            zones,
            surfaces,
            people,
            air_loops,
            number_of_enclosures,
            surfaces_by_zone,
        }
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn zone(&self, zone: usize) -> &Zone {
        &self.zones[zone]
    }

    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    pub fn surface(&self, surface: usize) -> &Surface {
        &self.surfaces[surface]
    }

    pub fn air_loops(&self) -> &[AirLoop] {
        &self.air_loops
    }

    pub fn number_of_enclosures(&self) -> usize {
        self.number_of_enclosures
    }

    /// Heat transfer surfaces belonging to a zone
    pub fn zone_surfaces(&self, zone: usize) -> &[usize] {
        &self.surfaces_by_zone[zone]
    }

    pub fn heat_transfer_surfaces(&self) -> impl Iterator<Item = (usize, &Surface)> {
        self.surfaces
            .iter()
            .enumerate()
            .filter(|(_, surface)| surface.heat_transfer)
    }

    pub fn controlled_zones(&self) -> impl Iterator<Item = usize> + '_ {
        self.zones
            .iter()
            .enumerate()
            .filter(|(_, zone)| zone.is_controlled)
            .map(|(zone_idx, _)| zone_idx)
    }

    /// Design occupancy of a zone summed over every people definition assigned to it
    pub fn number_of_people(&self, zone: usize) -> f64 {
        self.people
            .iter()
            .filter(|people| people.zone == zone)
            .map(|people| people.number_of_people)
            .sum()
    }

    pub fn component_areas(&self, zone: usize) -> ZoneComponentAreas {
        let mut areas = ZoneComponentAreas {
            floor_area: self.zones[zone].floor_area,
            ..Default::default()
        };
        for surface_idx in self.zone_surfaces(zone) {
            areas.add_surface(&self.surfaces[*surface_idx]);
        }
        areas
    }
}
