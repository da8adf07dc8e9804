mod ids;
mod location;
mod results;
mod track;

pub use ids::{MemberIndex, StormId, StormKey};
pub use location::{Basin, Location, UnknownBasin};
pub use results::{
    ClimatologyResult, ClimatologyRow, LocationReturnPeriods, ReturnPeriodCurve,
    ReturnPeriodTable,
};
pub use track::{EnsembleMember, Storm, TrackEnsemble, TrackPoint};
