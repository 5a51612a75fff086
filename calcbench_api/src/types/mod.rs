mod arg;
pub use self::arg::{PeriodArg, YearArg};

mod company;
pub use self::company::{CompanyIdentifier, CompanyRecord, MarketIndex};

mod disclosure;
pub use self::disclosure::{DisclosurePage, DisclosureResult};

mod fact;
pub use self::fact::FactRecord;

mod metric;
pub use self::metric::{MetricCatalog, MetricDefinition};

mod period;
pub use self::period::Period;

mod period_type;
pub use self::period_type::PeriodType;

mod timestamp;
pub use self::timestamp::parse_timestamp;

mod trace;
pub use self::trace::TraceFact;
