mod create_order;
mod helpers;
mod mocks;
mod verify;
mod webhook;
