// LogTab - app/mod.rs
//
// Application layer: conversion orchestration and console diagnostics.
// Dependencies: core and platform layers.

pub mod convert;
pub mod diagnostics;
