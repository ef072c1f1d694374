//! Component graph representations: and-inverter graphs (§4.C's cut
//! enumeration substrate) and majority/XOR graphs (§4.E's synthesis
//! target).

pub mod aig;
pub mod xmg;
