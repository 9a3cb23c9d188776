//! pc-driver: the local machine as readable points and invokable services
//!
//! [`PcDriver`] implements the [`Driver`] contract an orchestrator polls:
//! - `read` resolves each [`Point`] either by probing its address or by looking up a
//!   machine metric, isolating failures into `<name>-Status` entries;
//! - `control` dispatches a [`CommandRequest`] to one of the registered [`SERVICES`];
//! - `describe` emits a [`ThingSpec`], either the fixed metric set or the gateways and
//!   DNS servers of the local interfaces, depending on [`DiscoveryMode`].

mod types;
pub use types::{status_key, CommandRequest, Point, PointValue, ReadResult, STATUS_SUFFIX};

mod error;
pub use error::{DriverError, Result};

mod thing;
pub use thing::{
    AccessMode, DataSpecs, ParameterSpec, PropertySpec, ServiceSpec, ThingSpec, TypeSpec,
};

mod config;
pub use config::{load_config, DiscoveryMode, DriverConfig, PcParameter};

mod command;
pub use command::{Command, ParamDescriptor, ParamKind, ServiceDescriptor, SERVICES};

mod metrics;
pub use metrics::DriverMetrics;

mod resolver;

pub mod describe;

mod driver;
pub use driver::{Driver, PcDriver, PcDriverBuilder, PcNode};
