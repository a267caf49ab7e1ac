//! In-memory media types shared by the decode and encode sides.

pub(crate) mod codec;
pub(crate) mod frame;
pub(crate) mod packet;
