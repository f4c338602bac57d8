mod export;
mod rag_proxy;
mod wizard_flow;
