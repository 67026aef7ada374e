pub mod autopick;
pub mod board;
pub mod pick;
pub mod player;
pub mod pool;
pub mod roster;
pub mod sequencer;
pub mod state;
pub mod suggest;
pub mod tags;
