pub mod lettre_smtp;
pub mod mock_sender;

pub use lettre_smtp::LettreConnector;
pub use mock_sender::MockConnector;
