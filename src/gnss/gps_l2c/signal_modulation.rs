
use crate::{GnssSimErr, Result};
use super::{CM_CODE_LENGTH, CL_CODE_LENGTH};

// Register states are octal, as IS-GPS-200 Table 3-IIa lists them; chips come out of bit 0
const CM_INITIAL_STATE:[u32; 32] = [
	0o742417664, 0o756014035, 0o002747144, 0o066265724, 0o601403471, 0o703232733, 0o124510070, 0o617316361,	// PRN 01-08
	0o047541621, 0o733031046, 0o713512145, 0o024437606, 0o021264003, 0o230655351, 0o001314400, 0o222021506,	// PRN 09-16
	0o540264026, 0o205521705, 0o064022144, 0o120161274, 0o044023533, 0o724744327, 0o045743577, 0o741201660,	// PRN 17-24
	0o700274134, 0o010247261, 0o713433445, 0o737324162, 0o311627434, 0o710452007, 0o722462133, 0o050172213,	// PRN 25-32
];

const CL_INITIAL_STATE:[u32; 32] = [
	0o624145772, 0o506610362, 0o220360016, 0o710406104, 0o001143345, 0o053023326, 0o652521276, 0o206124777,	// PRN 01-08
	0o015563374, 0o561522076, 0o023163525, 0o117776450, 0o606516355, 0o003037343, 0o046515565, 0o671511621,	// PRN 09-16
	0o605402220, 0o002576207, 0o525163451, 0o266527765, 0o006760703, 0o501474556, 0o743747443, 0o615534726,	// PRN 17-24
	0o763621420, 0o720727474, 0o700521043, 0o222567263, 0o132765304, 0o746332245, 0o102300466, 0o255231716,	// PRN 25-32
];

const STATE_MASK:u32 = (1 << 27) - 1;

// Stages that receive the output bit on each shift
const FEEDBACK_TAPS:u32 = 0o045112474;

/// 27-stage modular shift register shared by the CM and CL generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModularShiftRegister {
	state:u32,
}

impl ModularShiftRegister {

	pub fn new(state:u32) -> Self { Self{ state: state & STATE_MASK } }

	pub fn state(&self) -> u32 { self.state }

	pub fn shift(&mut self) -> u8 {
		let current_output:u32 = self.state & 1;
		self.state = (self.state >> 1) | (current_output << 26);
		if current_output != 0 { self.state ^= FEEDBACK_TAPS; }
		current_output as u8
	}

}

fn check_prn(prn:u8, which:&str) -> Result<usize> {
	if prn >= 1 && prn <= 32 { Ok((prn - 1) as usize) }
	else { Err(GnssSimErr::InvalidArgument(format!("invalid PRN {} for {} code generation", prn, which))) }
}

fn run(initial_state:u32, len:usize) -> Vec<u8> {
	let mut shift_reg = ModularShiftRegister::new(initial_state);
	(0..len).map(|_| shift_reg.shift()).collect()
}

/// One 20 ms period of the L2 civil-moderate code as 0/1 chips.
pub fn cm_code(prn:u8) -> Result<Vec<u8>> {
	let idx = check_prn(prn, "CM")?;
	Ok(run(CM_INITIAL_STATE[idx], CM_CODE_LENGTH))
}

/// One 1.5 s period of the L2 civil-long code as 0/1 chips.
pub fn cl_code(prn:u8) -> Result<Vec<u8>> {
	let idx = check_prn(prn, "CL")?;
	Ok(run(CL_INITIAL_STATE[idx], CL_CODE_LENGTH))
}
