// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

mod directories;
mod errors;
mod pages;
mod static_files;
