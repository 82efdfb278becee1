use crate::cesu8_byte_buffer::{ByteBuffer, ByteWriter};
use crate::class_file_error::{ClassFileError, Result};
use crate::constant_pool::ConstantPoolIndex;

/// 只实现了生成字段访问方法需要用到的指令
/// https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-6.html#jvms-6.5
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Instruction {
    Aload0,
    Getfield(ConstantPoolIndex),
    Ireturn,
    Lreturn,
    Freturn,
    Dreturn,
    Areturn,
    Return,
}

impl Instruction {
    pub fn opcode(&self) -> u8 {
        match self {
            Instruction::Aload0 => 0x2a,
            Instruction::Getfield(_) => 0xb4,
            Instruction::Ireturn => 0xac,
            Instruction::Lreturn => 0xad,
            Instruction::Freturn => 0xae,
            Instruction::Dreturn => 0xaf,
            Instruction::Areturn => 0xb0,
            Instruction::Return => 0xb1,
        }
    }

    pub fn write_to(&self, writer: &mut ByteWriter) {
        writer.write_u8(self.opcode());
        if let Instruction::Getfield(index) = self {
            writer.write_u16(*index);
        }
    }
}

pub fn read_one_instruction(buffer: &mut ByteBuffer) -> Result<Instruction> {
    let op_code = buffer.read_u8()?;
    let instruction = match op_code {
        0x2a => Instruction::Aload0,
        0xb4 => Instruction::Getfield(buffer.read_u16()?),
        0xac => Instruction::Ireturn,
        0xad => Instruction::Lreturn,
        0xae => Instruction::Freturn,
        0xaf => Instruction::Dreturn,
        0xb0 => Instruction::Areturn,
        0xb1 => Instruction::Return,
        op_code => {
            return Err(ClassFileError::InvalidCode(format!(
                "Invalid Op Code {op_code:#04x}"
            )));
        }
    };
    Ok(instruction)
}

/// Decodes a whole method body.
pub fn read_instructions(code: &[u8]) -> Result<Vec<Instruction>> {
    let mut buffer = ByteBuffer::new(code);
    let mut instructions = Vec::new();
    while buffer.has_more_data() {
        instructions.push(read_one_instruction(&mut buffer)?);
    }
    Ok(instructions)
}
