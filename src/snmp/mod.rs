pub mod address;
pub mod client;
pub mod fake;
pub mod oid;
pub mod params;
pub mod security;
pub mod session;
pub mod transport;
pub mod v2c;
pub mod v3;

pub use address::TargetAddress;
pub use client::{Snmp2Connector, SnmpClient};
pub use oid::{OidCatalog, default_oids, normalize_oid, parse_oid};
pub use params::{SecurityParams, SessionParams, UsmParams};
pub use security::{AuthProtocol, PrivProtocol};
pub use session::SnmpSession;
pub use transport::{Connector, GetRequest, Response, Transport, VarBind};
pub use v2c::SnmpClientV2c;
pub use v3::SnmpClientV3;
