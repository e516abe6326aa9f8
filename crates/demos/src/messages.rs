/// Message set shared by every actor in the demos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoMsg {
	/// Sent by the ticker to the pinger.
	Tick { count: u32 },
	/// Request from the pinger to a worker.
	Ping { count: u32 },
	/// Worker reply echoing the ping's count.
	Pong { count: u32 },
}
