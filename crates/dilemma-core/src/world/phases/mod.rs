mod dynamics;
mod mutation;
mod payoff;
mod strategy;
