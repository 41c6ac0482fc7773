// SPDX-License-Identifier: GPL-3.0-only

//! Capture processing pipelines

pub mod photo;
