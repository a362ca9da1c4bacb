pub mod azure_openai_client;
