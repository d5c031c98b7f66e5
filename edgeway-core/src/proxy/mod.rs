mod edge_gateway;


pub use edge_gateway::EdgeGateway;
