pub mod webhook_sink;
