//! Solvers for Hamilton-Jacobi-Bellman optimal control.
//!
//! # Building blocks
//!
//! - [`grid`] — rectangular lattices, row-major enumeration, boundary policies
//! - [`gradient`] — one-sided differences and the Godunov upwind gradient
//! - [`hamiltonian`] — minimization of the Hamiltonian over a control grid
//!
//! # Solvers
//!
//! - [`pde`] — steady-state and time-dependent grid solvers
//! - [`mdp`] — value iteration for finite Markov decision processes
//! - [`policy`] — greedy and value-field feedback policies
//! - [`rollout`] — closed-loop trajectory simulation
//!
//! Every iterative solver reports progress through an
//! [`Observer`](hjb_core::Observer) and accepts `()` when no observation is
//! needed.

pub mod gradient;
pub mod grid;
pub mod hamiltonian;
pub mod mdp;
pub mod pde;
pub mod policy;
pub mod rollout;
